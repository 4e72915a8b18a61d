mod readers;
mod util;

pub use readers::{load_template, open_reader, parse_template, InputReader};
pub use util::{handle_error_and_exit, output_path, parse_sequence, Result};
