//! Keyboard task: turns debounced key events into HID reports.
//!
//! Events are taken off the key event channel strictly one at a time, and an
//! event is fully processed, including any layer stack mutation it causes,
//! before the next one is received. A layer key and a letter key pressed in
//! the same scan pass therefore resolve in queue order.

use core::cell::RefCell;

use embassy_futures::yield_now;
use embassy_time::Timer;
use usbd_hid::descriptor::{KeyboardReport, MediaKeyboardReport, MouseReport, SystemControlReport};

use crate::action::Action;
use crate::channel::{KEY_EVENT_CHANNEL, KEYBOARD_REPORT_CHANNEL};
use crate::config::BehaviorConfig;
use crate::event::KeyboardEvent;
use crate::hid::Report;
use crate::input_device::Runnable;
use crate::keyboard_macro::MacroOperation;
use crate::keycode::KeyCode;
use crate::keymap::KeyMap;
use crate::layer_stack::ActivationId;

pub struct Keyboard<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Keymap, shared with anything else that needs to inspect layer state
    keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>,

    /// Behavior config
    behavior: BehaviorConfig,

    /// Bitfield of currently held modifier keys
    held_modifiers: u8,

    /// Modifiers applied by `KeyWithModifier` actions currently held
    with_modifiers: u8,

    /// Physical position owning each of the 6 keycode slots
    registered_keys: [Option<(u8, u8)>; 6],

    /// Keycodes in the 6KRO report
    held_keycodes: [KeyCode; 6],

    /// Internal mouse report
    mouse_report: MouseReport,

    /// Internal media report
    media_report: MediaKeyboardReport,

    /// Internal system control report
    system_control_report: SystemControlReport,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Runnable
    for Keyboard<'a, ROW, COL, NUM_LAYER>
{
    /// Main keyboard processing task, it receives events from the key event
    /// channel and processes them into hid reports.
    async fn run(&mut self) {
        loop {
            let event = KEY_EVENT_CHANNEL.receive().await;
            self.process_inner(event).await;
        }
    }
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize>
    Keyboard<'a, ROW, COL, NUM_LAYER>
{
    pub fn new(keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>, behavior: BehaviorConfig) -> Self {
        Keyboard {
            keymap,
            behavior,
            held_modifiers: 0,
            with_modifiers: 0,
            registered_keys: [None; 6],
            held_keycodes: [KeyCode::No; 6],
            mouse_report: MouseReport {
                buttons: 0,
                x: 0,
                y: 0,
                wheel: 0,
                pan: 0,
            },
            media_report: MediaKeyboardReport { usage_id: 0 },
            system_control_report: SystemControlReport { usage_id: 0 },
        }
    }

    async fn send_report(&self, report: Report) {
        KEYBOARD_REPORT_CHANNEL.sender().send(report).await
    }

    /// Process key changes at (row, col)
    async fn process_inner(&mut self, event: KeyboardEvent) {
        let resolved = self.keymap.borrow().resolve(event);
        let Some(resolved) = resolved else {
            trace!("no action at ({}, {})", event.row, event.col);
            return;
        };
        debug!("resolved {:?} on layer {}", resolved.action, resolved.layer);
        self.process_action(resolved.action, event).await;
    }

    async fn process_action(&mut self, action: Action, event: KeyboardEvent) {
        match action {
            Action::Key(key) => self.process_action_keycode(key, event).await,
            Action::KeyWithModifier(key, modifiers) => {
                if event.pressed {
                    // Combined into the hid report, so the modifiers are
                    // "pressed" in the same report as the key
                    self.with_modifiers |= modifiers.to_hid_modifier_bits();
                } else {
                    self.with_modifiers &= !modifiers.to_hid_modifier_bits();
                }
                self.process_action_keycode(key, event).await;
            }
            Action::LayerMomentary(layer) => {
                let id = ActivationId::from_position(event.row, event.col, COL as u8);
                if event.pressed {
                    self.keymap.borrow_mut().activate(layer, id);
                } else {
                    self.keymap.borrow_mut().deactivate(id);
                }
            }
            Action::LayerToggle(layer) => {
                // Toggle on press only, the release is a no-op
                if event.pressed {
                    let id = ActivationId::from_position(event.row, event.col, COL as u8);
                    self.keymap.borrow_mut().toggle(layer, id);
                }
            }
            Action::Macro(index) => {
                if event.pressed {
                    self.process_action_macro(index).await;
                }
            }
        }
    }

    // Process a single keycode, typically a basic key or a modifier key.
    async fn process_action_keycode(&mut self, key: KeyCode, event: KeyboardEvent) {
        if key.is_consumer() {
            self.process_action_consumer_control(key, event).await;
        } else if key.is_system() {
            self.process_action_system_control(key, event).await;
        } else if key.is_mouse_key() {
            self.process_action_mouse(key, event).await;
        } else if key.is_modifier() {
            if event.pressed {
                self.held_modifiers |= key.as_modifier_bit();
            } else {
                self.held_modifiers &= !key.as_modifier_bit();
            }
            self.send_keyboard_report().await;
        } else if key.is_basic() {
            self.process_basic(key, event).await;
        } else {
            warn!("Unsupported key: {:?}", key);
        }
    }

    // Process a basic keypress/release
    async fn process_basic(&mut self, key: KeyCode, event: KeyboardEvent) {
        if event.pressed {
            self.register_keycode(key, Some((event.row, event.col)));
        } else {
            self.unregister_keycode(key, Some((event.row, event.col)));
        }
        self.send_keyboard_report().await;
    }

    /// Process consumer control action. Consumer control keys are keys in hid consumer page, such as media keys.
    async fn process_action_consumer_control(&mut self, key: KeyCode, event: KeyboardEvent) {
        self.media_report.usage_id = if event.pressed {
            key.as_consumer_control_usage_id() as u16
        } else {
            0
        };
        self.send_report(Report::MediaKeyboardReport(self.media_report)).await;
        yield_now().await;
    }

    /// Process system control action. System control keys are keys in system page, such as power key.
    async fn process_action_system_control(&mut self, key: KeyCode, event: KeyboardEvent) {
        if event.pressed {
            if let Some(system_key) = key.as_system_control_usage_id() {
                self.system_control_report.usage_id = system_key as u8;
                self.send_report(Report::SystemControlReport(self.system_control_report))
                    .await;
                yield_now().await;
            }
        } else {
            self.system_control_report.usage_id = 0;
            self.send_report(Report::SystemControlReport(self.system_control_report))
                .await;
            yield_now().await;
        }
    }

    /// Process mouse key action.
    async fn process_action_mouse(&mut self, key: KeyCode, event: KeyboardEvent) {
        let move_delta = self.behavior.mouse.move_delta;
        let wheel_delta = self.behavior.mouse.wheel_delta;
        if event.pressed {
            match key {
                KeyCode::MouseUp => self.mouse_report.y = -move_delta,
                KeyCode::MouseDown => self.mouse_report.y = move_delta,
                KeyCode::MouseLeft => self.mouse_report.x = -move_delta,
                KeyCode::MouseRight => self.mouse_report.x = move_delta,
                KeyCode::MouseWheelUp => self.mouse_report.wheel = wheel_delta,
                KeyCode::MouseWheelDown => self.mouse_report.wheel = -wheel_delta,
                KeyCode::MouseBtn1 => self.mouse_report.buttons |= 1 << 0,
                KeyCode::MouseBtn2 => self.mouse_report.buttons |= 1 << 1,
                KeyCode::MouseBtn3 => self.mouse_report.buttons |= 1 << 2,
                _ => {}
            }
        } else {
            match key {
                KeyCode::MouseUp | KeyCode::MouseDown => self.mouse_report.y = 0,
                KeyCode::MouseLeft | KeyCode::MouseRight => self.mouse_report.x = 0,
                KeyCode::MouseWheelUp | KeyCode::MouseWheelDown => self.mouse_report.wheel = 0,
                KeyCode::MouseBtn1 => self.mouse_report.buttons &= !(1 << 0),
                KeyCode::MouseBtn2 => self.mouse_report.buttons &= !(1 << 1),
                KeyCode::MouseBtn3 => self.mouse_report.buttons &= !(1 << 2),
                _ => {}
            }
        }
        self.send_report(Report::MouseReport(self.mouse_report)).await;
        yield_now().await;
    }

    /// Replay a stored macro sequence. Playback blocks the event queue until
    /// the sequence is done.
    async fn process_action_macro(&mut self, index: u8) {
        let sequences = self.behavior.keyboard_macros.sequences;
        let Some(sequence) = sequences.get(index as usize) else {
            warn!("macro {} is not defined", index);
            return;
        };
        for operation in sequence.iter() {
            match *operation {
                MacroOperation::Press(key) => {
                    self.register_keycode(key, None);
                    self.send_keyboard_report().await;
                }
                MacroOperation::Release(key) => {
                    self.unregister_keycode(key, None);
                    self.send_keyboard_report().await;
                }
                MacroOperation::Tap(key) => {
                    self.register_keycode(key, None);
                    self.send_keyboard_report().await;
                    Timer::after_millis(2).await;
                    self.unregister_keycode(key, None);
                    self.send_keyboard_report().await;
                }
                MacroOperation::Delay(ms) => {
                    Timer::after_millis(ms as u64).await;
                }
            }
        }
    }

    async fn send_keyboard_report(&mut self) {
        self.send_report(Report::KeyboardReport(KeyboardReport {
            modifier: self.held_modifiers | self.with_modifiers,
            reserved: 0,
            leds: 0,
            keycodes: self.held_keycodes.map(|k| k.as_keyboard_usage()),
        }))
        .await;
        // Yield once after sending the report to channel
        yield_now().await;
    }

    /// Register a keycode into the first free slot of the 6KRO report. A
    /// modifier keycode lands in the modifier bitfield instead.
    fn register_keycode(&mut self, key: KeyCode, pos: Option<(u8, u8)>) {
        if key.is_modifier() {
            self.held_modifiers |= key.as_modifier_bit();
            return;
        }
        // Prefer a slot already owned by this physical position
        let slot = self
            .registered_keys
            .iter()
            .position(|k| pos.is_some() && *k == pos)
            .or_else(|| self.held_keycodes.iter().position(|&k| k == KeyCode::No));
        match slot {
            Some(index) => {
                self.held_keycodes[index] = key;
                self.registered_keys[index] = pos;
            }
            None => warn!("all 6 keycode slots taken, dropping {:?}", key),
        }
    }

    /// Clear a keycode from the report, matching the registering position
    /// when one is known and the keycode itself otherwise.
    fn unregister_keycode(&mut self, key: KeyCode, pos: Option<(u8, u8)>) {
        if key.is_modifier() {
            self.held_modifiers &= !key.as_modifier_bit();
            return;
        }
        let slot = self
            .registered_keys
            .iter()
            .position(|k| pos.is_some() && *k == pos)
            .or_else(|| self.held_keycodes.iter().position(|&k| k == key));
        if let Some(index) = slot {
            self.held_keycodes[index] = KeyCode::No;
            self.registered_keys[index] = None;
        }
    }
}
