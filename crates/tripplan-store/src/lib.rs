//! Plan data model and local snapshot persistence for tripplan.

pub mod config;
pub mod kv;
pub mod models;
pub mod plans;

pub use config::StoreConfig;
pub use kv::{FileStore, KeyValueStore, KvError, MemoryStore};
pub use models::{
    Accommodation, DayPlan, ModelError, Plan, PlanId, PlanKind, ScheduleItem, TravelPlan,
    WeatherInfo,
};
pub use plans::{PlanStore, StoreError, share_url};
