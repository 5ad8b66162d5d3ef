mod actions;
mod components;
pub(crate) mod state;
mod view;

pub use view::ApplyView;

#[cfg(test)]
mod intent_smoke;
