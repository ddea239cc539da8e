//! Protocol definitions shared between the dashboard renderer and its fetch tasks.

use crate::error::Result;
use crate::model::{LatestOrder, OrderHistory, UserProfile};
use crate::page::ElementId;
use crate::store::DbPath;

/// Identifier of a render pass. Strictly increasing; responses carrying an older
/// generation than the current one are discarded.
pub type RenderGeneration = u64;

/// The three independent reads that make up a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetchKind {
    Profile,
    LatestOrder,
    History,
}

impl FetchKind {
    pub const ALL: [FetchKind; 3] = [FetchKind::Profile, FetchKind::LatestOrder, FetchKind::History];

    /// Database key read for `user_id`.
    pub fn path_for(self, user_id: &str) -> Result<DbPath> {
        match self {
            FetchKind::Profile => DbPath::root().child("users")?.child(user_id),
            FetchKind::LatestOrder => DbPath::root()
                .child("orders")?
                .child(user_id)?
                .child("latest"),
            FetchKind::History => DbPath::root()
                .child("orders")?
                .child(user_id)?
                .child("history"),
        }
    }

    /// Page regions this fetch writes to.
    pub fn targets(self) -> &'static [ElementId] {
        match self {
            FetchKind::Profile => &[ElementId::UserName],
            FetchKind::LatestOrder => &[ElementId::CartItems, ElementId::LatestOrder],
            FetchKind::History => &[ElementId::PastOrders],
        }
    }
}

/// Tagged result of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Found(T),
    NotFound,
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Found(value) => FetchOutcome::Found(f(value)),
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::Failed(reason) => FetchOutcome::Failed(reason),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }
}

/// Decoded value for one region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionData {
    Profile(UserProfile),
    LatestOrder(LatestOrder),
    History(OrderHistory),
}

/// Message sent from a fetch task back to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub generation: RenderGeneration,
    pub kind: FetchKind,
    pub outcome: FetchOutcome<RegionData>,
}

/// What the renderer did with a session notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDisposition {
    /// Nobody signed in: the warning was shown and the page sent to the root path.
    Redirected,
    /// A render pass was started.
    Rendering(RenderGeneration),
}
