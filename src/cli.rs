// ============================================================================
// PhotoBench command line - startup options for the GUI
// ============================================================================
//
// Usage examples:
//   photobench
//   photobench photo.jpg                 (open a file at startup)
//   photobench --camera 1 --lang ru
//   photobench --width 1024 --height 768

use std::path::PathBuf;

use clap::Parser;

use crate::i18n;

/// PhotoBench image viewer and processor.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "photobench",
    version,
    about = "Load a picture or a webcam snapshot and apply simple image operations"
)]
pub struct CliArgs {
    /// Image to open at startup.
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Index of the capture device used by Capture Photo.
    #[arg(short, long, default_value_t = 0, value_name = "INDEX")]
    pub camera: usize,

    /// Interface language (en, ru). Detected from the environment when omitted.
    #[arg(short, long, value_name = "CODE")]
    pub lang: Option<String>,

    /// Initial window width in points.
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Initial window height in points.
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,
}

impl CliArgs {
    /// Language to activate: the explicit `--lang` if given, otherwise the
    /// system locale. Unknown codes fall back to English in [`i18n::set_language`].
    pub fn language(&self) -> String {
        match &self.lang {
            Some(code) => code.trim().to_lowercase(),
            None => i18n::detect_system_language(),
        }
    }

    /// Window size, never smaller than a usable minimum.
    pub fn window_size(&self) -> [f32; 2] {
        [self.width.max(320.0), self.height.max(240.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["photobench"]).unwrap();
        assert!(args.image.is_none());
        assert_eq!(args.camera, 0);
        assert!(args.lang.is_none());
        assert_eq!(args.window_size(), [800.0, 600.0]);
    }

    #[test]
    fn positional_image_and_flags() {
        let args = CliArgs::try_parse_from([
            "photobench",
            "shots/cat.png",
            "--camera",
            "2",
            "--lang",
            " RU ",
            "--width",
            "100",
        ])
        .unwrap();
        assert_eq!(args.image, Some(PathBuf::from("shots/cat.png")));
        assert_eq!(args.camera, 2);
        assert_eq!(args.language(), "ru");
        assert_eq!(args.window_size(), [320.0, 600.0]);
    }

    #[test]
    fn rejects_negative_camera_index() {
        assert!(CliArgs::try_parse_from(["photobench", "--camera", "-1"]).is_err());
    }
}
