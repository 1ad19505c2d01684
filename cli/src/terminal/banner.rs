use colored::*;

use crate::terminal::print;

const BANNER: &str = r#"
    ____  ____  ____  ______   _____ _________    _   __
   / __ \/ __ \/ __ \/_  __/  / ___// ____/   |  / | / /
  / /_/ / / / / /_/ / / /     \__ \/ /   / /| | /  |/ /
 / ____/ /_/ / _, _/ / /     ___/ / /___/ ___ |/ /|  /
/_/    \____/_/ |_| /_/     /____/\____/_/  |_/_/ |_/
"#;

const TAGLINE: &str = "educational TCP port scanner, ethical use only";

pub fn print() {
    print::print(&format!("{}", BANNER.bright_cyan().bold()));
    print::centerln(&format!("{}", TAGLINE.italic().bright_black()));
}
