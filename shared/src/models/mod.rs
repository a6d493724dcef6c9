//! Master data, notification and report models
//!
//! Each master-data entity comes with `Create`/`Update` payloads and a
//! [`MasterData`] impl naming its REST collection.

pub mod menu;
pub mod notification;
pub mod product;
pub mod report;
pub mod role;
pub mod room;
pub mod staff;
pub mod supplier;
pub mod user;

pub use menu::*;
pub use notification::*;
pub use product::*;
pub use report::*;
pub use role::*;
pub use room::*;
pub use staff::*;
pub use supplier::*;
pub use user::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A CRUD-able master-data collection
pub trait MasterData: DeserializeOwned + Send + Sync + 'static {
    /// REST collection path segment, e.g. `products`
    const RESOURCE: &'static str;
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;
}

macro_rules! master_data {
    ($($entity:ty => $resource:literal, $create:ty, $update:ty;)+) => {
        $(impl MasterData for $entity {
            const RESOURCE: &'static str = $resource;
            type Create = $create;
            type Update = $update;
        })+
    };
}

master_data! {
    Product => "products", ProductCreate, ProductUpdate;
    MenuItem => "menus", MenuItemCreate, MenuItemUpdate;
    Staff => "staff", StaffCreate, StaffUpdate;
    Room => "rooms", RoomCreate, RoomUpdate;
    Supplier => "suppliers", SupplierCreate, SupplierUpdate;
    User => "users", UserCreate, UserUpdate;
    Role => "roles", RoleCreate, RoleUpdate;
}
