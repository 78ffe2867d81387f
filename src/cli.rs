use anyhow::{anyhow, bail, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckArgs {
    pub options: Option<PathBuf>,
    pub check_starter: bool,
    pub paths: Vec<PathBuf>,
}

impl CheckArgs {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = CheckArgs::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw) = iter.next() {
            let arg = raw.as_ref();
            match arg {
                "--options" => {
                    let value = iter.next().ok_or_else(|| anyhow!("Expected a value after '{arg}'"))?;
                    parsed.options = Some(PathBuf::from(value.as_ref()));
                }
                "--starter" => parsed.check_starter = true,
                flag if flag.starts_with("--") => {
                    bail!("Unknown flag '{flag}'. Supported flags: --options <file>, --starter.")
                }
                path => parsed.paths.push(PathBuf::from(path)),
            }
        }
        if parsed.paths.is_empty() && !parsed.check_starter {
            bail!("Nothing to check. Pass .rhai files, directories or --starter.");
        }
        Ok(parsed)
    }
}
