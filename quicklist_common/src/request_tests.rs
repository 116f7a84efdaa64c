use super::*;
use crate::model::AssetClass;

#[test]
fn subscribe_stream_body_matches_wire_shape() {
    let body = Request::SubscribeStream { req_id: 1 }.to_body().unwrap();
    assert_eq!(body, r#"{"Event":"SubscribeStream","ReqID":1}"#);
}

#[test]
fn get_quicklists_omits_unknown_scope() {
    let body = Request::GetQuicklists {
        owner: "o-1".to_string(),
        quicklist: None,
        req_id: 7,
    }
    .to_body()
    .unwrap();
    assert_eq!(body, r#"{"Event":"GetQuicklists","OwnerUUID":"o-1","ReqID":7}"#);
}

#[test]
fn get_tickers_carries_scope_when_known() {
    let body = Request::GetTickers {
        owner: "o-1".to_string(),
        quicklist: Some("q-1".to_string()),
        req_id: 3,
    }
    .to_body()
    .unwrap();
    assert_eq!(
        body,
        r#"{"Event":"GetTickers","OwnerUUID":"o-1","QuicklistUUID":"q-1","ReqID":3}"#
    );
}

#[test]
fn create_ticker_nests_the_instrument_object() {
    let request = Request::CreateTicker {
        req_id: 4,
        quicklist: "q-1".to_string(),
        owner: "o-1".to_string(),
        object: TickerObject {
            symbol: "BTC".to_string(),
            exchange: "".to_string(),
            asset: AssetClass::Crypto,
        },
    };
    let value: serde_json::Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();
    assert_eq!(value["Event"], "CreateTicker");
    assert_eq!(value["ReqID"], 4);
    assert_eq!(value["Object"]["AssetClass"], "Crypto");
    assert_eq!(value["Object"]["Symbol"], "BTC");
    assert_eq!(request.req_id(), 4);
}

#[test]
fn delete_ticker_decodes_back() {
    let body = r#"{"Event":"DeleteTicker","ReqID":9,"OwnerUUID":"o","TickerUUID":"t"}"#;
    let request: Request = serde_json::from_str(body).unwrap();
    assert_eq!(
        request,
        Request::DeleteTicker {
            req_id: 9,
            owner: "o".to_string(),
            ticker: "t".to_string()
        }
    );
}
