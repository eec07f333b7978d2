//! Finder window layout of the disk image.
//!
//! The layout is stored in the volume's `.DS_Store` by scripting Finder
//! while the writable image is mounted.

use super::creation;
use crate::bundler::{error::Result, pipeline::AssembledBundle, settings::DmgSettings};
use std::{path::Path, time::Duration};

const WINDOW_ORIGIN: u32 = 100;

/// Window geometry and item placement of the mounted image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinderLayout {
    /// Volume name as seen by Finder.
    pub volume_name: String,
    /// Window width in points.
    pub window_width: u32,
    /// Window height in points.
    pub window_height: u32,
    /// Icon size in points.
    pub icon_size: u32,
    /// Label font size.
    pub font_size: u32,
    /// File name of the background image in `.background/`.
    pub background: Option<String>,
    /// Bundle file names, in the order they are placed.
    pub items: Vec<String>,
}

impl FinderLayout {
    /// Layout for `bundles` with the window settings of `dmg`.
    pub fn new(volume_name: &str, dmg: &DmgSettings, bundles: &[AssembledBundle]) -> Self {
        Self {
            volume_name: volume_name.to_string(),
            window_width: dmg.window_width,
            window_height: dmg.window_height,
            icon_size: dmg.icon_size,
            font_size: dmg.font_size,
            background: dmg
                .background
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            items: bundles
                .iter()
                .filter_map(|bundle| bundle.path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .collect(),
        }
    }

    /// Icon positions: bundles left to right, `Applications` last.
    pub fn positions(&self) -> Vec<(String, u32, u32)> {
        let slots = self.items.len() as u32 + 1;
        let step = self.window_width / (slots + 1);
        let y = self.window_height / 2;

        self.items
            .iter()
            .cloned()
            .chain(std::iter::once("Applications".to_string()))
            .enumerate()
            .map(|(index, name)| (name, step * (index as u32 + 1), y))
            .collect()
    }

    /// The AppleScript applying this layout.
    pub fn script(&self) -> String {
        let background = match &self.background {
            Some(name) => format!(
                "set background picture of viewOptions to file \".background:{}\"\n",
                escape_applescript_string(name)
            ),
            None => String::new(),
        };

        let positions: String = self
            .positions()
            .into_iter()
            .map(|(name, x, y)| {
                format!(
                    "set position of item \"{}\" to {{{}, {}}}\n",
                    escape_applescript_string(&name),
                    x,
                    y
                )
            })
            .collect();

        format!(
            r#"tell application "Finder"
tell disk "{volume}"
open
set current view of container window to icon view
set toolbar visible of container window to false
set statusbar visible of container window to false
set bounds of container window to {{{left}, {top}, {right}, {bottom}}}
set viewOptions to icon view options of container window
set arrangement of viewOptions to not arranged
set icon size of viewOptions to {icon_size}
set text size of viewOptions to {font_size}
{background}{positions}close
open
update without registering applications
delay 2
end tell
end tell
"#,
            volume = escape_applescript_string(&self.volume_name),
            left = WINDOW_ORIGIN,
            top = WINDOW_ORIGIN,
            right = WINDOW_ORIGIN + self.window_width,
            bottom = WINDOW_ORIGIN + self.window_height,
            icon_size = self.icon_size,
            font_size = self.font_size,
        )
    }
}

/// Escapes backslashes and double quotes for AppleScript string literals.
pub fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}

/// Mounts `image`, applies `layout` and detaches again.
///
/// A failing script only logs a warning; the image stays usable without
/// the layout.
pub async fn apply_layout(image: &Path, layout: &FinderLayout) -> Result<()> {
    log::info!("Applying DMG window layout...");

    let mount_point = creation::attach(image, &layout.volume_name).await?;

    match tokio::process::Command::new("osascript")
        .arg("-e")
        .arg(layout.script())
        .output()
        .await
    {
        Ok(output) if output.status.success() => log::debug!("Finder layout applied"),
        Ok(output) => log::warn!(
            "AppleScript execution had issues: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => log::warn!("Could not run osascript: {}", e),
    }

    // .DS_Store is written asynchronously by Finder
    tokio::time::sleep(Duration::from_secs(2)).await;
    creation::detach(&mount_point).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FinderLayout {
        FinderLayout {
            volume_name: "Demo \"Suite\"".into(),
            window_width: 400,
            window_height: 300,
            icon_size: 128,
            font_size: 16,
            background: Some("bg.png".into()),
            items: vec!["Demo.app".into()],
        }
    }

    #[test]
    fn test_positions_spread_across_window() {
        assert_eq!(
            layout().positions(),
            vec![
                ("Demo.app".to_string(), 133, 150),
                ("Applications".to_string(), 266, 150),
            ]
        );
    }

    #[test]
    fn test_script_uses_window_settings() {
        let script = layout().script();
        assert!(script.contains(r#"tell disk "Demo \"Suite\"""#));
        assert!(script.contains("set bounds of container window to {100, 100, 500, 400}"));
        assert!(script.contains("set icon size of viewOptions to 128"));
        assert!(script.contains("set text size of viewOptions to 16"));
        assert!(script.contains(r#"file ".background:bg.png""#));
        assert!(script.contains(r#"set position of item "Applications" to {266, 150}"#));
    }

    #[test]
    fn test_escape_applescript_string() {
        assert_eq!(escape_applescript_string("My\"App"), "My\\\"App");
        assert_eq!(escape_applescript_string("Path\\File"), "Path\\\\File");
    }
}
