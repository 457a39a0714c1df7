//! Recognized General options and their typed accessors.
//!
//! Each row declares a key, its [`OptionKind`] and, for regular options, the
//! getter/setter pair generated for it. Rows without accessors have
//! hand-written ones below the table.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone};

use super::model::{ToolKind, UserColor, WindowMode};
use super::registry::OptionSpec;
use super::ConfigStore;
use crate::error::ConfigError;
use crate::value::color::Color;
use crate::value::{filename, OptionKind};

macro_rules! general_options {
    ($($key:literal => $kind:expr $(, $get:ident / $set:ident : $ty:ty)? ;)*) => {
        /// Every recognized key of the General group.
        pub static GENERAL_OPTIONS: &[OptionSpec] = &[$(OptionSpec { key: $key, kind: $kind }),*];

        impl ConfigStore {
            $($(
                #[doc = concat!("Returns the `", $key, "` option.")]
                pub fn $get(&self) -> $ty {
                    self.typed($key)
                }

                #[doc = concat!("Stores the `", $key, "` option.")]
                pub fn $set(&mut self, value: $ty) -> Result<(), ConfigError> {
                    self.set_typed($key, &value)
                }
            )?)*
        }
    };
}

general_options! {
    "userColors" => OptionKind::UserColors, user_colors / set_user_colors: Vec<UserColor>;
    "savePath" => OptionKind::ExistingDir, save_path / set_save_path: PathBuf;
    "savePathFixed" => OptionKind::Bool(false), save_path_fixed / set_save_path_fixed: bool;
    "uiColor" => OptionKind::Color(Color::rgb(116, 0, 150)), ui_color / set_ui_color: Color;
    "contrastUiColor" => OptionKind::Color(Color::rgb(39, 0, 50)), contrast_ui_color / set_contrast_ui_color: Color;
    "drawColor" => OptionKind::Color(Color::rgb(255, 0, 0)), draw_color / set_draw_color: Color;
    "fontFamily" => OptionKind::Text(""), font_family / set_font_family: String;
    "showHelp" => OptionKind::Bool(true), show_help / set_show_help: bool;
    "showSidePanelButton" => OptionKind::Bool(true), show_side_panel_button / set_show_side_panel_button: bool;
    "showDesktopNotification" => OptionKind::Bool(true), show_desktop_notification / set_show_desktop_notification: bool;
    "filenamePattern" => OptionKind::FilenamePattern, filename_pattern / set_filename_pattern: String;
    "disabledTrayIcon" => OptionKind::Bool(false), disabled_tray_icon / set_disabled_tray_icon: bool;
    "drawThickness" => OptionKind::at_least(1, 3), draw_thickness / set_draw_thickness: i32;
    "drawFontSize" => OptionKind::at_least(1, 8), draw_font_size / set_draw_font_size: i32;
    "keepOpenAppLauncher" => OptionKind::Bool(false), keep_open_app_launcher / set_keep_open_app_launcher: bool;
    "checkForUpdates" => OptionKind::Bool(true), check_for_updates / set_check_for_updates: bool;
    "showStartupLaunchMessage" => OptionKind::Bool(true), show_startup_launch_message / set_show_startup_launch_message: bool;
    "contrastOpacity" => OptionKind::between(0, 255, 190), contrast_opacity / set_contrast_opacity: i32;
    "copyAndCloseAfterUpload" => OptionKind::Bool(true), copy_and_close_after_upload / set_copy_and_close_after_upload: bool;
    "historyConfirmationToDelete" => OptionKind::Bool(true), history_confirmation_to_delete / set_history_confirmation_to_delete: bool;
    "uploadHistoryMax" => OptionKind::at_least(0, 25), upload_history_max / set_upload_history_max: i32;
    "saveAfterCopy" => OptionKind::Bool(false), save_after_copy / set_save_after_copy: bool;
    "copyPathAfterSave" => OptionKind::Bool(false), copy_path_after_save / set_copy_path_after_save: bool;
    "useJpgForClipboard" => OptionKind::Bool(false), use_jpg_for_clipboard / set_use_jpg_for_clipboard: bool;
    "ignoreUpdateToVersion" => OptionKind::Text(""), ignore_update_to_version / set_ignore_update_to_version: String;
    "undoLimit" => OptionKind::between(0, 999, 100), undo_limit / set_undo_limit: i32;
    "buttons" => OptionKind::ButtonList, buttons / set_buttons: Vec<ToolKind>;
    "startupLaunch" => OptionKind::Bool(true);
    "saveAsFileExtension" => OptionKind::SaveFileExtension;
    "windowMode" => OptionKind::WindowMode;
}

impl ConfigStore {
    pub fn startup_launch(&self) -> bool {
        self.typed("startupLaunch")
    }

    /// Stores `startupLaunch`; a no-op if the value is unchanged.
    pub fn set_startup_launch(&mut self, start: bool) -> Result<(), ConfigError> {
        if start == self.startup_launch() {
            return Ok(());
        }
        self.set_typed("startupLaunch", &start)
    }

    /// Image format for saved captures, lowercase without a leading dot.
    pub fn save_as_file_extension(&self) -> String {
        self.typed("saveAsFileExtension")
    }

    /// Accepts `jpg`, `.JPG` and the like.
    pub fn set_save_as_file_extension(&mut self, extension: &str) -> Result<(), ConfigError> {
        self.set_typed("saveAsFileExtension", &extension.to_string())
    }

    pub fn window_mode(&self) -> WindowMode {
        self.typed("windowMode")
    }

    pub fn set_window_mode(&mut self, mode: WindowMode) -> Result<(), ConfigError> {
        self.set_typed("windowMode", &mode)
    }

    /// Shows every tool in the toolbar.
    pub fn set_all_the_buttons(&mut self) -> Result<(), ConfigError> {
        self.set_buttons(ToolKind::ALL.to_vec())
    }

    /// Built-in screenshot filename template.
    pub fn filename_pattern_default(&self) -> &'static str {
        filename::DEFAULT_PATTERN
    }

    /// Filename for a capture taken at `time`, from the configured pattern.
    pub fn render_filename<Tz>(&self, time: &DateTime<Tz>) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        filename::render_filename(&self.filename_pattern(), time)
    }
}
