//! Previous/next page buttons.
//!
//! Both buttons and the left/right arrow keys perform a full navigation to
//! the neighbouring page file, wrapping at both ends of the registry.

mod navigator_component;

pub use navigator_component::PrevNextNavigator;
