pub mod report;
pub mod traverse;

use colored::Colorize;

const BANNER: &str = r"
    ____  _     ______                       __
   / __ \(_)___/_  __/________ __   _____  / /__  _____
  / / / / / ___// / / ___/ __ `/ | / / _ \/ / _ \/ ___/
 / /_/ / / /   / / / /  / /_/ /| |/ /  __/ /  __/ /
/_____/_/_/   /_/ /_/   \__,_/ |___/\___/_/\___/_/
";

pub fn print_banner() {
    println!("{}", BANNER.bright_white());
    println!(
        "  {} {}\n",
        "recursive web directory enumeration".bright_cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
