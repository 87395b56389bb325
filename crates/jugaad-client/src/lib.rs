//! Typed client for the Jugaad backend plus the dependent-fetch
//! coordination layer that gates item queries on resolved identity and
//! location.

pub mod api;
pub mod coordinator;
pub mod error;
pub mod types;

pub use api::BackendClient;
pub use coordinator::{
    FetchCoordinator, FetchNotice, Prerequisite, Prerequisites, ViewState,
};
pub use error::ApiError;
pub use types::{
    AlertRequest, DeleteItemRequest, ItemDetail, ItemMetadata, ItemQuery, ItemsQuery, MealPlan,
    PlanItem, PricePoint, SignupRequest, TrackedItem,
};
