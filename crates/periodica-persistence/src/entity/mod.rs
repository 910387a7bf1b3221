//! SeaORM entity definitions

pub mod element;

pub mod prelude {
    pub use super::element::Entity as Elements;
}
