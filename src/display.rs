//! # Text Display Module
//!
//! Renders a controller frame as a fixed 80-column text screen for the
//! debug monitor.

use std::fmt::Write;

use crate::controller::clock::Clock;
use crate::controller::gamepad::GamepadController;
use crate::controller::state::Button;
use crate::driver::PadDriver;

/// Width every rendered line is padded to.
pub const LINE_WIDTH: usize = 79;

/// Number of cells in a stick bar.
const STICK_CELLS: i32 = 13;

/// Number of cells in a trigger bar.
const TRIGGER_CELLS: i32 = 10;

const RULE_HEAVY: &str =
    "===============================================================================";
const RULE_LIGHT: &str =
    "-------------------------------------------------------------------------------";
const TITLE: &str = "                    PADFRAME CONTROLLER MONITOR";
const FOOTER: &str = " Ctrl+C / q: Exit  |  v: Vibration Strong  |  b: Vibration Weak";

/// Bar for a stick axis (-1.0 to 1.0).
///
/// The centre cell is always `|`; the marker `*` shows the position.
///
/// # Examples
///
/// ```
/// use padframe::display::stick_bar;
///
/// assert_eq!(stick_bar(-1.0), "[*-----|------]");
/// assert_eq!(stick_bar(1.0), "[------|-----*]");
/// ```
#[must_use]
pub fn stick_bar(value: f32) -> String {
    let center = STICK_CELLS / 2;
    let pos = (((value + 1.0) * center as f32) as i32).clamp(0, STICK_CELLS - 1);

    let mut bar = String::with_capacity(STICK_CELLS as usize + 2);
    bar.push('[');
    for i in 0..STICK_CELLS {
        bar.push(if i == center {
            '|'
        } else if i == pos {
            '*'
        } else {
            '-'
        });
    }
    bar.push(']');
    bar
}

/// Fill bar for a trigger (0.0 to 1.0).
///
/// # Examples
///
/// ```
/// use padframe::display::trigger_bar;
///
/// assert_eq!(trigger_bar(0.0), "[          ]");
/// assert_eq!(trigger_bar(0.5), "[=====     ]");
/// ```
#[must_use]
pub fn trigger_bar(value: f32) -> String {
    let filled = ((value * TRIGGER_CELLS as f32) as i32).clamp(0, TRIGGER_CELLS);

    let mut bar = String::with_capacity(TRIGGER_CELLS as usize + 2);
    bar.push('[');
    for i in 0..TRIGGER_CELLS {
        bar.push(if i < filled { '=' } else { ' ' });
    }
    bar.push(']');
    bar
}

/// `[label]` when pressed, ` label ` otherwise.
#[must_use]
pub fn button_label(pressed: bool, label: &str) -> String {
    if pressed {
        format!("[{}]", label)
    } else {
        format!(" {} ", label)
    }
}

/// Lists this frame's edges: `A+` for a press, `A-` for a release.
pub fn event_line<D: PadDriver, C: Clock>(pad: &GamepadController<D, C>) -> String {
    let mut line = String::from(" Event:");
    for button in Button::ALL {
        if pad.is_triggered(button) {
            let _ = write!(line, " {}+", button.label());
        }
    }
    for button in Button::ALL {
        if pad.is_released(button) {
            let _ = write!(line, " {}-", button.label());
        }
    }
    line
}

fn push_line(screen: &mut String, text: &str) {
    let _ = writeln!(screen, "{:<width$}", text, width = LINE_WIDTH);
}

fn render_waiting(screen: &mut String) {
    push_line(screen, " Controller not connected...");
    push_line(screen, "");
    push_line(screen, " Waiting for a gamepad (/dev/input/event*)");
    for _ in 0..14 {
        push_line(screen, "");
    }
}

fn render_frame<D: PadDriver, C: Clock>(screen: &mut String, pad: &GamepadController<D, C>) {
    let state = pad.current_state();
    let label = |button: Button, text: &str| button_label(pad.is_pressed(button), text);

    let vibrating = if pad.is_vibrating() { "[VIBRATING]" } else { "" };
    push_line(
        screen,
        &format!(" Status: Connected (slot {}){:>44}", pad.active_slot(), vibrating),
    );
    push_line(screen, RULE_LIGHT);

    push_line(
        screen,
        &format!(
            " L Stick | X:{:6.2} {}   Y:{:6.2} {}",
            state.left_stick_x,
            stick_bar(state.left_stick_x),
            state.left_stick_y,
            stick_bar(state.left_stick_y)
        ),
    );
    push_line(
        screen,
        &format!(
            " R Stick | X:{:6.2} {}   Y:{:6.2} {}",
            state.right_stick_x,
            stick_bar(state.right_stick_x),
            state.right_stick_y,
            stick_bar(state.right_stick_y)
        ),
    );
    push_line(
        screen,
        &format!(
            " Trigger | LT:{:5.2} {}    RT:{:5.2} {}",
            state.left_trigger,
            trigger_bar(state.left_trigger),
            state.right_trigger,
            trigger_bar(state.right_trigger)
        ),
    );
    push_line(screen, RULE_LIGHT);

    push_line(
        screen,
        &format!(
            "  D-PAD        {}                MAIN             {}",
            label(Button::DpadUp, "U"),
            label(Button::FaceUp, "Y")
        ),
    );
    push_line(
        screen,
        &format!(
            "            {}   {}                           {}  {}",
            label(Button::DpadLeft, "L"),
            label(Button::DpadRight, "R"),
            label(Button::FaceLeft, "X"),
            label(Button::FaceRight, "B")
        ),
    );
    push_line(
        screen,
        &format!(
            "               {}                                 {}",
            label(Button::DpadDown, "D"),
            label(Button::FaceDown, "A")
        ),
    );
    push_line(screen, RULE_LIGHT);

    push_line(
        screen,
        &format!(
            " Shoulder: {} {}                                     {} {}",
            label(Button::L1, "LB"),
            label(Button::L2, "LT"),
            label(Button::R2, "RT"),
            label(Button::R1, "RB")
        ),
    );
    push_line(
        screen,
        &format!(
            " Stick   : {}                                             {}",
            label(Button::L3, "LS"),
            label(Button::R3, "RS")
        ),
    );
    push_line(
        screen,
        &format!(
            " System  : {}                                      {}",
            label(Button::Select, "BACK"),
            label(Button::Start, "START")
        ),
    );
    push_line(screen, RULE_LIGHT);
    push_line(screen, &event_line(pad));
}

/// Renders the full monitor screen for the current frame.
pub fn render<D: PadDriver, C: Clock>(pad: &GamepadController<D, C>) -> String {
    let mut screen = String::new();
    push_line(&mut screen, RULE_HEAVY);
    push_line(&mut screen, TITLE);
    push_line(&mut screen, RULE_HEAVY);

    if pad.is_connected() {
        render_frame(&mut screen, pad);
    } else {
        render_waiting(&mut screen);
    }

    push_line(&mut screen, RULE_HEAVY);
    push_line(&mut screen, FOOTER);
    screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::clock::ManualClock;
    use crate::controller::tracker::ControllerSettings;
    use crate::driver::mocks::ScriptedDriver;
    use crate::driver::{buttons, RawReading};

    fn pad(driver: ScriptedDriver) -> GamepadController<ScriptedDriver, ManualClock> {
        GamepadController::with_clock(driver, ControllerSettings::default(), ManualClock::new())
    }

    #[test]
    fn test_stick_bar_center() {
        assert_eq!(stick_bar(0.0), "[------|------]");
    }

    #[test]
    fn test_stick_bar_extremes() {
        assert_eq!(stick_bar(-1.0), "[*-----|------]");
        assert_eq!(stick_bar(1.0), "[------|-----*]");
        assert_eq!(stick_bar(5.0), "[------|-----*]");
        assert_eq!(stick_bar(-5.0), "[*-----|------]");
    }

    #[test]
    fn test_stick_bar_width() {
        for value in [-1.0, -0.3, 0.0, 0.7, 1.0] {
            assert_eq!(stick_bar(value).chars().count(), 15);
        }
    }

    #[test]
    fn test_trigger_bar() {
        assert_eq!(trigger_bar(0.0), "[          ]");
        assert_eq!(trigger_bar(1.0), "[==========]");
        assert_eq!(trigger_bar(0.25), "[==        ]");
        assert_eq!(trigger_bar(2.0), "[==========]");
    }

    #[test]
    fn test_button_label() {
        assert_eq!(button_label(true, "LB"), "[LB]");
        assert_eq!(button_label(false, "LB"), " LB ");
    }

    #[test]
    fn test_event_line_lists_edges() {
        let mut pad = pad(ScriptedDriver::connected_at(0, RawReading::with_buttons(buttons::B)));
        pad.update();
        assert_eq!(event_line(&pad), " Event: B+");

        pad.driver_mut().set(0, RawReading::with_buttons(buttons::START));
        pad.update();
        assert_eq!(event_line(&pad), " Event: START+ B-");

        pad.update();
        assert_eq!(event_line(&pad), " Event:");
    }

    #[test]
    fn test_render_disconnected() {
        let mut pad = pad(ScriptedDriver::new(4));
        pad.update();
        let screen = render(&pad);
        assert!(screen.contains("Controller not connected"));
        assert!(!screen.contains("L Stick"));
    }

    #[test]
    fn test_render_connected() {
        let raw = RawReading {
            buttons: buttons::LEFT_SHOULDER,
            ..RawReading::default()
        };
        let mut pad = pad(ScriptedDriver::connected_at(0, raw));
        pad.update();
        let screen = render(&pad);

        assert!(screen.contains("Status: Connected (slot 0)"));
        assert!(screen.contains("[LB]"));
        assert!(screen.contains(" RB "));
        assert!(screen.contains("Event: LB+"));
        for line in screen.lines() {
            assert!(line.chars().count() >= LINE_WIDTH);
        }
    }

    #[test]
    fn test_render_shows_vibration() {
        let mut pad = pad(ScriptedDriver::connected_at(0, RawReading::default()));
        pad.update();
        pad.start_vibration(1.0, 1.0);
        assert!(render(&pad).contains("[VIBRATING]"));
    }
}
