//! different utility modules used throughout the project
/// logger initialization and saving of the plotted series into csv
pub mod logger;
/// drawing of the figure with plotters, in memory or into png/jpeg files
pub mod plots;
/// pretty-printed table of per-curve statistics (tabled)
pub mod series_stats;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
/// typed launcher task built on top of task_parser, with defaults for missing keys
pub mod task;
