use std::io::{self, BufRead, Write};

use crate::terminal::print;

const TERMS_OF_USE: &str = "
This software is intended for education and authorized testing only.
You must hold explicit permission to scan the target.
Misuse may violate local law and lead to civil or criminal penalties.
BY CONTINUING YOU DECLARE THAT YOU UNDERSTAND AND AGREE TO THESE TERMS.
";

const ACCEPT_WORD: &str = "ACCEPT";

/// Shows the ethical-use notice and asks for explicit acceptance on stdin.
pub fn prompt(q_level: u8) -> io::Result<bool> {
    print::header("terms of use", q_level);
    for line in TERMS_OF_USE.trim().lines() {
        print::print_status(line);
    }

    let mut stdout = io::stdout();
    write!(stdout, "Type '{ACCEPT_WORD}' to continue: ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_acceptance(&answer))
}

pub fn is_acceptance(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(ACCEPT_WORD)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
