//! Spinner abstraction that becomes no-op when the `progress` feature is disabled

#[cfg(feature = "progress")]
pub use indicatif::{ProgressBar, ProgressStyle};

#[cfg(not(feature = "progress"))]
pub use self::noop::*;

#[cfg(not(feature = "progress"))]
mod noop {
    use std::time::Duration;

    /// No-op spinner when `progress` feature is disabled
    #[derive(Clone)]
    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new_spinner() -> Self {
            ProgressBar
        }

        pub fn set_style(&self, _style: ProgressStyle) {}
        pub fn set_message(&self, _msg: impl Into<std::borrow::Cow<'static, str>>) {}
        pub fn enable_steady_tick(&self, _interval: Duration) {}
        pub fn finish_and_clear(&self) {}
    }

    /// No-op progress style
    pub struct ProgressStyle;

    impl ProgressStyle {
        pub fn default_spinner() -> Self {
            ProgressStyle
        }

        pub fn template(self, _template: &str) -> Result<Self, std::convert::Infallible> {
            Ok(self)
        }
    }
}

/// Spinner shown while a long step (corpus load, index decode) runs
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
