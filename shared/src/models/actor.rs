//! Staff and supplier (farmer) roster models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two kinds of profit-sharing actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    Staff,
    Farmer,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::Staff => "staff",
            ActorType::Farmer => "farmer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "staff" => Some(ActorType::Staff),
            "farmer" => Some(ActorType::Farmer),
            _ => None,
        }
    }
}

/// A roster entry: a staff member or a supplying farmer.
///
/// Names are unique within a type; the commission rate is the fraction of
/// attributed sales paid out to the actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffFarmer {
    pub id: i64,
    pub actor_type: ActorType,
    pub name: String,
    pub commission_rate: Decimal,
}
