use crate::locate::CONTEXT_SEPARATOR;

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}

/// Validates a user-supplied sequence and normalizes it to upper case.
pub fn parse_sequence(s: &str) -> Result<Vec<u8>> {
    let seq = s.trim();
    if seq.is_empty() {
        return Err("Sequence cannot be empty".to_string());
    }
    if let Some(c) = seq
        .chars()
        .find(|&c| c.is_whitespace() || !c.is_ascii() || c == CONTEXT_SEPARATOR as char)
    {
        return Err(format!("Invalid symbol '{}' in sequence: {}", c, seq));
    }
    Ok(seq.as_bytes().to_ascii_uppercase())
}

pub fn output_path(output_prefix: &str, output_suffix: &str) -> String {
    format!("{}.{}", output_prefix, output_suffix)
}
