//! Subcommand implementations for `tibtool`.
//!
//! Each `pub fn` here backs one subcommand and exits the process with status
//! 1 on failure. The fallible parts are split out so they can be tested.

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod build_ops;
pub mod config_ops;
pub mod convert_ops;
pub mod dict_ops;
