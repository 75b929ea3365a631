//! Clock and period formatting for scoreboard text.

/// Format a clock value as `MM:SS`.
///
/// With `show_tenths`, values under a minute render as `SS.0` (the clock
/// resolution is whole seconds, so the tenths digit is always zero).
pub fn format_time(seconds: u32, show_tenths: bool) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if show_tenths && seconds < 60 {
        return format!("{secs:02}.0");
    }
    format!("{mins:02}:{secs:02}")
}

/// Format a penalty countdown as `M:SS`.
pub fn format_penalty_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Short period label: `OT` in overtime, otherwise `P{n}`.
pub fn period_label(period: u32, is_overtime: bool) -> String {
    if is_overtime {
        "OT".to_owned()
    } else {
        format!("P{period}")
    }
}
