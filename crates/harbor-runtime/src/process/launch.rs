//! Launch argument expansion.

use std::path::Path;

/// Replace `{prefix}`, `{config}` and `{pid_path}` in every argument.
pub fn expand_launch_args(
    args: &[String],
    prefix: &Path,
    config: &Path,
    pid_path: &Path,
) -> Vec<String> {
    let prefix = prefix.display().to_string();
    let config = config.display().to_string();
    let pid_path = pid_path.display().to_string();

    args.iter()
        .map(|arg| {
            arg.replace("{prefix}", &prefix)
                .replace("{config}", &config)
                .replace("{pid_path}", &pid_path)
        })
        .collect()
}
