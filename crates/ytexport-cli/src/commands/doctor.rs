use anyhow::Result;
use std::path::Path;
use std::process::Command;
use ytexport_core::{config::Config, freetube};

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    println!("yt-playlist-export dependency check\n");

    let config = Config::load(config_path)?;
    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp:        ");
    match config.yt_dlp_path() {
        Ok(path) => match Command::new(&path).arg("--version").output() {
            Ok(out) if out.status.success() => {
                let v = String::from_utf8_lossy(&out.stdout);
                println!("OK ({}, {})", v.trim(), path.display());
            }
            _ => {
                println!("FOUND but failed to get version ({})", path.display());
                all_ok = false;
            }
        },
        Err(_) => {
            println!("NOT FOUND");
            println!("               Install with: pipx install yt-dlp");
            all_ok = false;
        }
    }

    // Check cookie settings
    print!("cookies:       ");
    if let Some(ref file) = config.auth.cookies {
        if file.is_file() {
            println!("OK (file {})", file.display());
        } else {
            println!("MISSING ({})", file.display());
            all_ok = false;
        }
    } else {
        match config.extractor_options(false) {
            Ok(options) => match options.browser_cookies {
                Some(spec) => println!("OK (browser {})", spec),
                None => println!("none"),
            },
            Err(e) => {
                println!("INVALID ({})", e);
                all_ok = false;
            }
        }
    }

    // Check FreeTube database location
    print!("FreeTube db:   ");
    let db = freetube::resolve_db_path(None);
    if db.exists() {
        println!("OK ({})", db.display());
    } else {
        println!("NOT FOUND ({})", db.display());
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}
