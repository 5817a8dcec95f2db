//! threadprep - SQL placeholder preparation and comment thread rendering
//!
//! ## Quick Start
//!
//! ```bash
//! # Expand a list placeholder and escape the values
//! threadprep prepare "SELECT * FROM t WHERE id IN(%,d)" "[1,2,3]"
//!
//! # Show the comment query for a post
//! threadprep query --post 1
//!
//! # Render a post's comments from a comment file
//! threadprep render --store comments.json --post 1
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
