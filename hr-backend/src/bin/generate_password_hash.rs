// src/bin/generate_password_hash.rs

//! `INITIAL_ADMIN_PASSWORD_HASH` 用のハッシュを出力する

use hr_backend::utils::password::PasswordManager;
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> io::Result<ExitCode> {
    let password = match env::args().nth(1) {
        Some(password) => password,
        None => {
            print!("Enter password to hash: ");
            io::stdout().flush()?;

            let mut password = String::new();
            io::stdin().read_line(&mut password)?;
            password.trim().to_string()
        }
    };

    let hashed = PasswordManager::from_env().and_then(|manager| manager.hash_password(&password));
    match hashed {
        Ok(hash) => {
            println!("INITIAL_ADMIN_PASSWORD_HASH={}", hash);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
