use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the bus itself and for logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub bus: BusSettings,
    pub log: LogSettings,
}

/// Configuration settings for a bus.
///
/// `capacity` is the buffer size of every subscriber endpoint and
/// `queue_capacity` the number of commands that can wait for the dispatch
/// loop before callers have to wait too.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BusSettings {
    pub capacity: usize,
    pub queue_capacity: usize,
}

/// Configuration settings for logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LogSettings {
    pub level: String,
    pub with_target: bool,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled in from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub bus: Option<PartialBusSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBusSettings {
    pub capacity: Option<usize>,
    pub queue_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
    pub with_target: Option<bool>,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            capacity: 1,
            queue_capacity: 1,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bus: BusSettings::default(),
            log: LogSettings::default(),
        }
    }
}

impl PartialSettings {
    /// Fills every missing value from `defaults`.
    pub fn merge(self, defaults: Settings) -> Settings {
        let bus = self.bus.unwrap_or(PartialBusSettings {
            capacity: None,
            queue_capacity: None,
        });
        let log = self.log.unwrap_or(PartialLogSettings {
            level: None,
            with_target: None,
        });

        Settings {
            bus: BusSettings {
                capacity: bus.capacity.unwrap_or(defaults.bus.capacity),
                queue_capacity: bus.queue_capacity.unwrap_or(defaults.bus.queue_capacity),
            },
            log: LogSettings {
                level: log.level.unwrap_or(defaults.log.level),
                with_target: log.with_target.unwrap_or(defaults.log.with_target),
            },
        }
    }
}
