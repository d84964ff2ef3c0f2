use crate::domain::ports::ProgressNotifier;
use crate::utils::error::{Result, ScheduleError};
use std::path::{Path, PathBuf};

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// 從輸入檔案中挑出要處理的 PNG，只取第一張。
pub fn select_png_input<N: ProgressNotifier + ?Sized>(
    inputs: &[PathBuf],
    notifier: &N,
) -> Result<PathBuf> {
    let pngs: Vec<&PathBuf> = inputs.iter().filter(|p| is_png(p)).collect();

    if inputs.len() > pngs.len() {
        notifier.warn("Input does not contain only .png images");
    }

    match pngs.as_slice() {
        [] => {
            notifier.error("Input does not contain a .png file");
            Err(ScheduleError::InputError {
                message: "No .png screenshot was provided".to_string(),
            })
        }
        [only] => Ok((*only).clone()),
        [first, ..] => {
            notifier.info("Got multiple files, picking only the first one...");
            Ok((*first).clone())
        }
    }
}
