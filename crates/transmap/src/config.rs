/// Default for [`Config::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options recognized by a [`MapperFactory`](crate::MapperFactory).
///
/// Passed once to the factory builder; there are no process-wide defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Config {
    /// When `true`, a null source property clears the destination property.
    /// When `false`, the destination keeps its current value.
    pub map_nulls: bool,

    /// When `true`, a type pair with no registered class map is mapped by
    /// matching property names. When `false`, mapping such a pair fails.
    pub use_auto_mapping: bool,

    pub cycle_mode: CycleMode,

    /// Maximum nesting of object mappings within one call. Each level costs
    /// several interpreter frames, so the default stays well inside a 2 MiB
    /// thread stack.
    pub max_depth: usize,

    /// Log every compiled plan at `debug` level.
    pub dump_plans: bool,
}

/// How repeated references to the same source object are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CycleMode {
    /// Every source object is mapped at most once per destination type within
    /// a mapping call; further references resolve to the same destination
    /// instance. Cyclic graphs are preserved.
    #[default]
    Identity,

    /// Source objects are mapped again on every reference. Cheaper for trees,
    /// but a cyclic graph fails once `max_depth` is reached.
    NonCyclic,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            map_nulls: true,
            use_auto_mapping: true,
            cycle_mode: CycleMode::Identity,
            max_depth: DEFAULT_MAX_DEPTH,
            dump_plans: false,
        }
    }
}
