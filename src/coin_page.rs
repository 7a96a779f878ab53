use crate::error::{SnapshotError, SnapshotResult};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// `data` of an `objects(filter: {type: ...})` query.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjectsPage {
    pub objects: Option<CoinConnection>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinConnection {
    pub page_info: Option<PageInfo>,
    pub nodes: Option<Vec<CoinNode>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinNode {
    pub owner: Option<ObjectOwner>,
    pub as_move_object: Option<MoveObject>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectOwner {
    #[serde(rename = "__typename")]
    pub typename: Option<String>,
    pub owner: Option<OwnerRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnerRef {
    pub address: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveObject {
    pub contents: Option<MoveContents>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveContents {
    pub json: Value,
}

impl ObjectsPage {
    /// Builds a page of address-owned coins, mostly useful for fakes.
    pub fn new(
        holders: Vec<(&str, &str)>,
        has_next_page: bool,
        end_cursor: Option<&str>,
    ) -> Self {
        let nodes = holders
            .into_iter()
            .map(|(owner, balance)| CoinNode::address_owned(owner, balance))
            .collect();
        Self {
            objects: Some(CoinConnection {
                page_info: Some(PageInfo {
                    has_next_page,
                    end_cursor: end_cursor.map(str::to_string),
                }),
                nodes: Some(nodes),
            }),
        }
    }
}

impl CoinNode {
    pub fn address_owned(owner: &str, balance: &str) -> Self {
        Self {
            owner: Some(ObjectOwner {
                typename: Some("AddressOwner".to_string()),
                owner: Some(OwnerRef {
                    address: Some(owner.to_string()),
                }),
            }),
            as_move_object: Some(MoveObject {
                contents: Some(MoveContents {
                    json: serde_json::json!({ "balance": balance }),
                }),
            }),
        }
    }

    pub fn owner_address(&self) -> Option<&str> {
        self.owner
            .as_ref()
            .and_then(|owner| owner.owner.as_ref())
            .and_then(|owner| owner.address.as_deref())
    }

    pub fn balance(&self) -> SnapshotResult<BigUint> {
        let balance = self
            .as_move_object
            .as_ref()
            .and_then(|object| object.contents.as_ref())
            .and_then(|contents| contents.json.get("balance"))
            .ok_or_else(|| {
                SnapshotError::MalformedResponse("coin object has no balance".to_string())
            })?;
        parse_raw_amount(balance)
    }

    /// `None` for coins that are shared, immutable or owned by another object.
    pub fn holder(&self) -> SnapshotResult<Option<(&str, BigUint)>> {
        match self.owner_address() {
            None => Ok(None),
            Some(address) => Ok(Some((address, self.balance()?))),
        }
    }
}

/// Balances come as `"123"`, `123` or `{"value": "123"}`.
pub fn parse_raw_amount(value: &Value) -> SnapshotResult<BigUint> {
    let malformed = || {
        SnapshotError::MalformedResponse(format!(
            "balance is not a non-negative integer: {value}"
        ))
    };
    match value {
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            BigUint::from_str(s).map_err(|_| malformed())
        }
        Value::Number(n) => n.as_u64().map(BigUint::from).ok_or_else(malformed),
        Value::Object(map) => map
            .get("value")
            .ok_or_else(malformed)
            .and_then(parse_raw_amount),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use crate::coin_page::{parse_raw_amount, ObjectsPage};
    use crate::error::SnapshotError;
    use num_bigint::BigUint;
    use serde_json::json;

    #[test]
    fn parses_indexer_page() {
        let page: ObjectsPage = serde_json::from_value(json!({
            "objects": {
                "pageInfo": { "hasNextPage": true, "endCursor": "IAvb" },
                "nodes": [
                    {
                        "owner": {
                            "__typename": "AddressOwner",
                            "owner": { "address": "0xa11ce" }
                        },
                        "asMoveObject": {
                            "contents": {
                                "json": { "id": "0x01", "balance": { "value": "1500000" } }
                            }
                        }
                    },
                    {
                        "owner": { "__typename": "Shared" },
                        "asMoveObject": {
                            "contents": { "json": { "id": "0x02", "balance": "7" } }
                        }
                    }
                ]
            }
        }))
        .unwrap();

        let connection = page.objects.unwrap();
        let page_info = connection.page_info.unwrap();
        assert!(page_info.has_next_page);
        assert_eq!(page_info.end_cursor.as_deref(), Some("IAvb"));

        let nodes = connection.nodes.unwrap();
        let (owner, balance) = nodes[0].holder().unwrap().unwrap();
        assert_eq!(owner, "0xa11ce");
        assert_eq!(balance, BigUint::from(1_500_000u64));
        assert!(nodes[1].holder().unwrap().is_none());
    }

    #[test]
    fn missing_connection_deserializes_to_none() {
        let page: ObjectsPage = serde_json::from_value(json!({ "objects": null })).unwrap();
        assert!(page.objects.is_none());
    }

    #[test]
    fn raw_amount_forms() {
        assert_eq!(parse_raw_amount(&json!("12")).unwrap(), BigUint::from(12u64));
        assert_eq!(parse_raw_amount(&json!(12)).unwrap(), BigUint::from(12u64));
        assert_eq!(
            parse_raw_amount(&json!({ "value": "340282366920938463463374607431768211456" }))
                .unwrap(),
            BigUint::from(u128::MAX) + BigUint::from(1u64)
        );
        for bad in [json!("-1"), json!(""), json!(1.5), json!(-3), json!(null), json!({})] {
            assert!(
                matches!(
                    parse_raw_amount(&bad),
                    Err(SnapshotError::MalformedResponse(_))
                ),
                "{}",
                bad
            );
        }
    }
}
