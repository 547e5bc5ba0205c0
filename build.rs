use clap::{Command, CommandFactory};
use clap_complete::{generate_to, Shell};
use std::{env, io::Error};

include!("src/cli.rs");

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    if env::var_os("CARGO_FEATURE_COMPLETIONS").is_none() {
        return Ok(());
    }
    let outdir = match env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return Ok(()),
    };
    let bin_name = "marquee";

    let mut cmd: Command = Cli::command();
    let shells: [Shell; 4] = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::Elvish];
    for shell in shells {
        let path = generate_to(shell, &mut cmd, bin_name, &outdir)?;
        println!("cargo:warning=completion file for {shell} is generated in {}", path.display());
    }
    Ok(())
}
