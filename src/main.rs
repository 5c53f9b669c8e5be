mod converter;

use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    let lat_first = !std::env::args().any(|arg| arg == "--lon-first");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", converter::convert_line(&line, lat_first))?;
    }

    Ok(())
}
