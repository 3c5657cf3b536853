use log::LevelFilter;

pub use crate::traits::Progress;

const TEMPLATE: &str = "{bar:60.green/green} {msg} {pos}/{len} [{elapsed}]";

impl Progress for indicatif::ProgressBar {
    fn inc(&self, i: u64) {
        indicatif::ProgressBar::inc(self, i)
    }

    fn finish(&self) {
        indicatif::ProgressBar::finish(self)
    }
}

impl Progress for logbar::ProgressBar {
    fn inc(&self, i: u64) {
        logbar::ProgressBar::inc(self, i as usize)
    }

    fn finish(&self) {
        logbar::ProgressBar::finish(self)
    }
}

/// Progress bar for the event loop
///
/// On an interactive terminal this is an `indicatif` bar, otherwise a
/// `logbar` one. No bar is shown unless the log level is exactly
/// `info`. While a bar is shown logging is switched off. The default
/// shows nothing.
#[derive(Default)]
pub struct ProgressBar {
    bar: Option<Box<dyn Progress>>,
    suspended_level: Option<LevelFilter>,
}

impl Progress for ProgressBar {
    fn inc(&self, i: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(i);
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
        if let Some(level) = self.suspended_level {
            log::set_max_level(level);
        }
    }
}

impl ProgressBar {
    /// A new progress bar with the given maximum progress and message
    pub fn new(len: u64, message: &str) -> Self {
        if log::max_level().to_level() != Some(log::Level::Info) {
            return Self::default();
        }
        let bar: Box<dyn Progress> =
            if console::Term::stderr().features().is_attended() {
                let bar = indicatif::ProgressBar::new(len)
                    .with_message(message.to_owned());
                if let Ok(style) = indicatif::ProgressStyle::with_template(TEMPLATE) {
                    bar.set_style(style);
                }
                Box::new(bar)
            } else {
                eprintln!("{message}");
                let style = logbar::Style::new().indicator('█');
                Box::new(logbar::ProgressBar::with_style(len as usize, style))
            };

        // logging would overwrite the bar
        let level = log::max_level();
        log::set_max_level(LevelFilter::Off);
        Self {
            bar: Some(bar),
            suspended_level: Some(level),
        }
    }

    /// Whether a bar is actually shown
    pub fn is_shown(&self) -> bool {
        self.bar.is_some()
    }
}
