//! Database entities (database-first schema).

pub mod empleados;

pub mod prelude {
    pub use super::empleados::Entity as Empleados;
}
