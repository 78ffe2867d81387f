use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kestrel_script_attach::cli::CheckArgs;
use kestrel_script_attach::{PluginOptions, ScriptValidator};

fn main() {
    let args = match CheckArgs::parse_from_env() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("[script-check] {err}");
            std::process::exit(2);
        }
    };
    match run(&args) {
        Ok(0) => {}
        Ok(failed) => {
            eprintln!("[script-check] {failed} script(s) failed");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("[script-check] error: {err:?}");
            std::process::exit(2);
        }
    }
}

fn run(args: &CheckArgs) -> Result<usize> {
    let options = match &args.options {
        Some(path) => PluginOptions::load(path)?,
        None => PluginOptions::default(),
    };
    let validator = ScriptValidator::new();
    let mut failed = 0usize;
    if args.check_starter && !report("<starter>", validator.validate(&options.starter)) {
        failed += 1;
    }
    let mut scripts = Vec::new();
    for root in &args.paths {
        scripts.extend(collect_scripts(root)?);
    }
    for script in &scripts {
        let source =
            std::fs::read_to_string(script).with_context(|| format!("Reading '{}'", script.display()))?;
        if !report(&script.display().to_string(), validator.validate(&source)) {
            failed += 1;
        }
    }
    println!("[script-check] checked {} script(s)", scripts.len() + usize::from(args.check_starter));
    Ok(failed)
}

fn report(name: &str, result: Result<(), kestrel_script_attach::ValidationError>) -> bool {
    match result {
        Ok(()) => {
            println!("[script-check] ok    {name}");
            true
        }
        Err(err) => {
            println!("[script-check] FAIL  {name}: {err}");
            false
        }
    }
}

fn collect_scripts(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    if root.is_file() {
        out.push(root.to_path_buf());
        return Ok(out);
    }
    for entry in std::fs::read_dir(root).with_context(|| format!("Reading '{}'", root.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            out.extend(collect_scripts(&path)?);
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("rhai") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}
