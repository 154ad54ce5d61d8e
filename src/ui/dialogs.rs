use std::time::Duration;

use gtk4::gio;
use gtk4::prelude::*;
use gtk4::{Adjustment, ApplicationWindow, Dialog, Label, ResponseType, Scale, Switch};
use tracing::warn;

use super::app::SharedController;
use crate::i18n::I18n;
use crate::storage::{self, MAX_COMPUTER_DELAY_MS};

fn pad_button(btn: &impl IsA<gtk4::Widget>) {
    btn.set_margin_start(8);
    btn.set_margin_end(8);
    btn.set_margin_top(6);
    btn.set_margin_bottom(6);
}

fn pad_content(dialog: &Dialog) -> gtk4::Box {
    let content = dialog.content_area();
    content.set_spacing(12);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content
}

/// Show a settings dialog (computer delay, reset scoreboard).
pub fn show_settings_dialog(parent: &ApplicationWindow, controller: SharedController, i18n: &I18n) {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(&i18n.t("settings-title")));
    dialog.set_default_width(380);

    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    let cancel_btn = dialog.add_button(&i18n.t("cancel"), ResponseType::Cancel);
    pad_button(&ok_btn);
    pad_button(&cancel_btn);

    let content = pad_content(&dialog);

    // ── Computer delay ──
    let current_ms = controller.borrow().delay().as_millis() as f64;
    let delay_label = Label::new(Some(&format!(
        "{}: {}",
        i18n.t("settings-delay"),
        current_ms as u64
    )));
    content.append(&delay_label);

    let delay_adj = Adjustment::new(
        current_ms,
        0.0,
        MAX_COMPUTER_DELAY_MS as f64,
        50.0,
        250.0,
        0.0,
    );
    let delay_scale = Scale::new(gtk4::Orientation::Horizontal, Some(&delay_adj));
    delay_scale.set_digits(0);
    delay_scale.set_hexpand(true);
    content.append(&delay_scale);

    {
        let delay_label = delay_label.clone();
        let key = i18n.t("settings-delay");
        delay_adj.connect_value_changed(move |adj| {
            delay_label.set_text(&format!("{}: {}", key, adj.value() as u64));
        });
    }

    // ── Reset scoreboard ──
    let reset_switch = Switch::new();
    reset_switch.set_active(false);
    let reset_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    reset_box.append(&Label::new(Some(&i18n.t("settings-reset"))));
    reset_box.append(&reset_switch);
    content.append(&reset_box);

    dialog.connect_response(move |dialog, response| {
        if response == ResponseType::Accept {
            let delay_ms = delay_adj.value().round() as u64;
            let mut ctrl = controller.borrow_mut();
            ctrl.set_delay(Duration::from_millis(delay_ms));
            if reset_switch.is_active() {
                ctrl.reset_statistics();
            }
            drop(ctrl);

            let mut settings = storage::load_settings();
            settings.computer_delay_ms = delay_ms;
            if let Err(e) = storage::save_settings(&settings) {
                warn!("could not save settings: {}", e);
            }
        }
        dialog.close();
    });

    dialog.show();
}

/// Show a simple info message box.
pub fn show_info(parent: &ApplicationWindow, title: &str, message: &str, i18n: &I18n) {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(title));
    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    pad_button(&ok_btn);

    let content = pad_content(&dialog);
    // Markup so the rules link is clickable.
    let label = Label::new(None);
    label.set_wrap(true);
    label.set_use_markup(true);
    label.set_markup(message);
    label.connect_activate_link(|_, uri| {
        if let Err(e) = gio::AppInfo::launch_default_for_uri(uri, None::<&gio::AppLaunchContext>) {
            warn!("failed to open link {}: {}", uri, e);
            return gtk4::Inhibit(false);
        }
        gtk4::Inhibit(true)
    });
    content.append(&label);

    dialog.connect_response(|dialog, _| {
        dialog.close();
    });

    dialog.show();
}

/// Ask before quitting a running game. The caller connects the response.
pub fn confirm_close(parent: &ApplicationWindow, i18n: &I18n) -> Dialog {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(&i18n.t("close-confirm-title")));

    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    let cancel_btn = dialog.add_button(&i18n.t("cancel"), ResponseType::Cancel);
    pad_button(&ok_btn);
    pad_button(&cancel_btn);

    let content = pad_content(&dialog);
    let label = Label::new(Some(&i18n.t("close-confirm-message")));
    label.set_wrap(true);
    content.append(&label);

    dialog
}
