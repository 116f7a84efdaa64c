use super::*;

fn ticker(uuid: &str, quicklist: &str, symbol: &str) -> Ticker {
    Ticker {
        uuid: uuid.to_string(),
        quicklist: quicklist.to_string(),
        asset: AssetClass::Stock,
        exchange: "NYSE".to_string(),
        symbol: symbol.to_string(),
    }
}

fn quicklist(uuid: &str, owner: &str, name: &str) -> Quicklist {
    Quicklist {
        uuid: uuid.to_string(),
        owner: owner.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn server_status_is_keyed_by_host() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.server_status("api").unwrap(), None);

    store.set_server_status("api", ServerStatus::Up).unwrap();
    store.set_server_status("api", ServerStatus::Queue).unwrap();
    store.set_server_status("other", ServerStatus::Down).unwrap();

    assert_eq!(store.server_status("api").unwrap(), Some(ServerStatus::Queue));
    assert_eq!(store.server_status("other").unwrap(), Some(ServerStatus::Down));
}

#[test]
fn owner_insert_is_idempotent() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert!(store.insert_owner_if_absent("o-1").unwrap());
    store.advance_cursor("o-1", 4).unwrap();
    assert!(!store.insert_owner_if_absent("o-1").unwrap());
    assert_eq!(store.owner_cursor("o-1").unwrap(), Some(4));
}

#[test]
fn cursor_never_moves_backwards() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.owner_cursor("o-1").unwrap(), None);

    store.advance_cursor("o-1", 5).unwrap();
    store.advance_cursor("o-1", 3).unwrap();
    assert_eq!(store.owner_cursor("o-1").unwrap(), Some(5));

    store.advance_cursor("o-1", 6).unwrap();
    assert_eq!(store.owner_cursor("o-1").unwrap(), Some(6));
    assert_eq!(
        store.owners().unwrap(),
        vec![Owner {
            uuid: "o-1".to_string(),
            cursor: 6
        }]
    );
}

#[test]
fn quicklist_upsert_materializes_owner_and_renames() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.upsert_quicklist(&quicklist("q-1", "o-1", "Tech")).unwrap();
    assert_eq!(store.owner_cursor("o-1").unwrap(), Some(0));

    store.upsert_quicklist(&quicklist("q-1", "o-1", "Growth")).unwrap();
    assert_eq!(store.quicklist("q-1").unwrap().unwrap().name, "Growth");
    assert!(store.rename_quicklist("q-1", "Value").unwrap());
    assert!(!store.rename_quicklist("q-404", "Ghost").unwrap());
    assert_eq!(store.quicklist("q-404").unwrap(), None);
}

#[test]
fn quicklists_are_listed_by_name() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.upsert_quicklist(&quicklist("q-1", "o-1", "Zeta")).unwrap();
    store.upsert_quicklist(&quicklist("q-2", "o-1", "Alpha")).unwrap();

    let names: Vec<String> = store.quicklists().unwrap().into_iter().map(|q| q.name).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
    assert!(store.delete_quicklist("q-1").unwrap());
    assert!(!store.delete_quicklist("q-1").unwrap());
    assert_eq!(store.quicklist_ids().unwrap(), vec!["q-2".to_string()]);
}

#[test]
fn ticker_upsert_overwrites_fields() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.upsert_ticker(&ticker("t-1", "q-1", "AAPL")).unwrap();

    let mut moved = ticker("t-1", "q-2", "AAPL");
    moved.asset = AssetClass::Crypto;
    moved.exchange = String::new();
    store.upsert_ticker(&moved).unwrap();

    assert_eq!(store.ticker("t-1").unwrap(), Some(moved));
    assert!(store.tickers_in("q-1").unwrap().is_empty());
    assert_eq!(store.tickers_in("q-2").unwrap().len(), 1);
}

#[test]
fn atomically_commits_on_success() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .atomically(|s| {
            s.upsert_ticker(&ticker("t-1", "q-1", "AAPL"))?;
            s.advance_cursor("o-1", 2)
        })
        .unwrap();

    assert!(store.ticker("t-1").unwrap().is_some());
    assert_eq!(store.owner_cursor("o-1").unwrap(), Some(2));
}

#[test]
fn atomically_rolls_back_on_error() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let result: Result<()> = store.atomically(|s| {
        s.upsert_ticker(&ticker("t-1", "q-1", "AAPL"))?;
        Err(QuicklistError::Format("boom".to_string()))
    });

    assert!(result.is_err());
    assert_eq!(store.ticker("t-1").unwrap(), None);
    store.upsert_ticker(&ticker("t-2", "q-1", "MSFT")).unwrap();
    assert_eq!(store.ticker_ids().unwrap(), vec!["t-2".to_string()]);
}

#[test]
fn replica_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replica.db");
    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.upsert_quicklist(&quicklist("q-1", "o-1", "Tech")).unwrap();
        store.advance_cursor("o-1", 9).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.owner_cursor("o-1").unwrap(), Some(9));
    assert_eq!(store.quicklist("q-1").unwrap().unwrap().name, "Tech");
}

#[test]
fn references_are_not_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteStore::open(&dir.path().join("replica.db")).unwrap();
    let enforced: bool = store
        .conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert!(!enforced);

    store.upsert_ticker(&ticker("t-1", "q-missing", "AAPL")).unwrap();
    store.upsert_quicklist(&quicklist("q-1", "o-1", "Tech")).unwrap();
    store.upsert_ticker(&ticker("t-2", "q-1", "MSFT")).unwrap();
    assert!(store.delete_quicklist("q-1").unwrap());

    assert_eq!(store.quicklist_ids().unwrap(), Vec::<String>::new());
    assert_eq!(
        store.ticker_ids().unwrap(),
        vec!["t-1".to_string(), "t-2".to_string()]
    );
}
