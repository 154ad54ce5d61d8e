use std::cell::RefCell;
use std::rc::Rc;

use fluent_bundle::FluentArgs;
use gtk4::gdk::Display;
use gtk4::gio::{Menu, SimpleAction};
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, AspectFrame, Box as GtkBox, Button, CssProvider, DrawingArea,
    HeaderBar, Label, MenuButton, Orientation, Separator, STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use tracing::{info, warn};

use super::board::{self, SharedFrame};
use super::controller::{Controller, Renderer};
use super::dialogs;
use crate::game::logic::Snapshot;
use crate::game::types::Mode;
use crate::i18n::I18n;

pub type SharedController = Rc<RefCell<Controller<GtkView>>>;

/// The widgets that display engine state.
pub struct GtkView {
    i18n: Rc<I18n>,
    status: Label,
    stat_x: Label,
    stat_o: Label,
    stat_computer: Label,
    stat_drawn: Label,
    board: DrawingArea,
    frame: SharedFrame,
}

impl Renderer for GtkView {
    fn render(&mut self, snapshot: &Snapshot) {
        let i18n = &self.i18n;
        self.status.set_text(&i18n.status(&snapshot.message));

        let stats = &snapshot.statistics;
        self.stat_x
            .set_text(&format!("{}: {}", i18n.t("stat-x"), stats.x_wins));
        self.stat_o
            .set_text(&format!("{}: {}", i18n.t("stat-o"), stats.o_wins));
        self.stat_computer.set_text(&format!(
            "{}: {}",
            i18n.t("stat-computer"),
            stats.computer_wins
        ));
        self.stat_drawn
            .set_text(&format!("{}: {}", i18n.t("stat-drawn"), stats.draws));

        *self.frame.borrow_mut() = Some(snapshot.clone());
        self.board.queue_draw();
    }
}

fn save_window_geometry(win: &ApplicationWindow) {
    let mut s = crate::storage::load_settings();
    s.window_width = Some(win.width());
    s.window_height = Some(win.height());
    if let Err(e) = crate::storage::save_settings(&s) {
        warn!("could not save window geometry: {}", e);
    }
}

fn stat_label() -> Label {
    let label = Label::new(None);
    label.add_css_class("stat-label");
    label
}

/// Build and present the main application window.
pub fn build_ui(app: &Application, resources_dir: &str) {
    let settings = crate::storage::load_settings();
    let i18n = Rc::new(I18n::load_from_dir(resources_dir));
    info!(lang = i18n.current_language(), "building main window");

    // ── CSS ──
    let provider = CssProvider::new();
    let css = "
        .title-label  { font-weight: 700; font-size: 15px; }
        .status-label { font-size: 18px; font-weight: 600; margin: 6px; }
        .stat-label   { font-size: 12px; margin: 0 6px; }
        .game-board   { background-color: #2b2b30; }
    ";
    provider.load_from_data(css);
    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    // ── Window ──
    let window = ApplicationWindow::builder()
        .application(app)
        .title(&i18n.t("app-title"))
        .default_width(420)
        .default_height(560)
        .resizable(true)
        .build();

    if let (Some(w), Some(h)) = (settings.window_width, settings.window_height) {
        window.set_default_size(w, h);
    }

    // ── Header bar ──
    let header = HeaderBar::new();
    header.set_show_title_buttons(true);
    let header_title = Label::new(Some(&i18n.t("app-title")));
    header_title.add_css_class("title-label");
    header.set_title_widget(Some(&header_title));

    // ── Hamburger menu ──
    let menu = Menu::new();
    menu.append(Some(&i18n.t("menu-settings")), Some("win.settings"));
    menu.append(Some(&i18n.t("menu-info")), Some("win.info"));

    let menu_button = MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");
    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    // ── Main layout ──
    let main_box = GtkBox::new(Orientation::Vertical, 0);

    let controls = GtkBox::new(Orientation::Horizontal, 8);
    controls.set_halign(gtk4::Align::Center);
    controls.set_margin_top(8);
    let pvp_btn = Button::with_label(&i18n.t("mode-pvp"));
    let pvc_btn = Button::with_label(&i18n.t("mode-pvc"));
    let reset_btn = Button::with_label(&i18n.t("reset"));
    controls.append(&pvp_btn);
    controls.append(&pvc_btn);
    controls.append(&reset_btn);
    main_box.append(&controls);

    let status = Label::new(None);
    status.add_css_class("status-label");
    main_box.append(&status);

    let drawing_area = board::create_board();
    drawing_area.add_css_class("game-board");
    let aspect_frame = AspectFrame::new(0.5, 0.5, 1.0, false);
    aspect_frame.set_child(Some(&drawing_area));
    aspect_frame.set_hexpand(true);
    aspect_frame.set_vexpand(true);
    main_box.append(&aspect_frame);

    // Scoreboard
    let status_bar = GtkBox::new(Orientation::Horizontal, 8);
    status_bar.set_margin_start(8);
    status_bar.set_margin_end(8);
    status_bar.set_margin_top(4);
    status_bar.set_margin_bottom(4);

    let frame = SharedFrame::default();
    let view = GtkView {
        i18n: i18n.clone(),
        status,
        stat_x: stat_label(),
        stat_o: stat_label(),
        stat_computer: stat_label(),
        stat_drawn: stat_label(),
        board: drawing_area.clone(),
        frame: frame.clone(),
    };
    status_bar.append(&view.stat_x);
    status_bar.append(&Separator::new(Orientation::Vertical));
    status_bar.append(&view.stat_o);
    status_bar.append(&Separator::new(Orientation::Vertical));
    status_bar.append(&view.stat_computer);
    status_bar.append(&Separator::new(Orientation::Vertical));
    status_bar.append(&view.stat_drawn);
    main_box.append(&status_bar);

    // ── Shared state ──
    let controller: SharedController = Rc::new(RefCell::new(Controller::new(
        view,
        settings.computer_delay(),
    )));
    controller.borrow_mut().refresh();
    board::attach(&drawing_area, controller.clone(), frame);

    // ── Mode and reset buttons ──
    {
        let controller = controller.clone();
        pvp_btn.connect_clicked(move |_| controller.borrow_mut().start(Mode::PvP));
    }
    {
        let controller = controller.clone();
        pvc_btn.connect_clicked(move |_| controller.borrow_mut().start(Mode::PvComputer));
    }
    {
        let controller = controller.clone();
        reset_btn.connect_clicked(move |_| controller.borrow_mut().reset());
    }

    // ── Actions ──
    // Settings
    {
        let action = SimpleAction::new("settings", None);
        let controller = controller.clone();
        let i18n = i18n.clone();
        let win_for_closure = window.clone();
        action.connect_activate(move |_, _| {
            dialogs::show_settings_dialog(&win_for_closure, controller.clone(), &i18n);
        });
        window.add_action(&action);
    }

    // Info
    {
        let action = SimpleAction::new("info", None);
        let win_for_closure = window.clone();
        let i18n = i18n.clone();
        action.connect_activate(move |_, _| {
            let mut args = FluentArgs::new();
            args.set("version", env!("CARGO_PKG_VERSION"));
            // Fluent keeps literal "\n" sequences; turn them into real newlines
            let mut body = i18n.t_args("info-body", &args).replace("\\n", "\n");
            body.push_str("\n\n");
            body.push_str(&i18n.t("info-link"));
            dialogs::show_info(&win_for_closure, &i18n.t("menu-info"), &body, &i18n);
        });
        window.add_action(&action);
    }

    // ── Close-request handler (warn if game in progress) ──
    {
        let controller = controller.clone();
        let i18n = i18n.clone();
        window.connect_close_request(move |win| {
            let running = {
                let ctrl = controller.borrow();
                ctrl.engine().is_running() && ctrl.engine().has_moves()
            };
            if running {
                let dialog = dialogs::confirm_close(win, &i18n);
                let win = win.clone();
                dialog.connect_response(move |dialog, response| {
                    dialog.close();
                    if response == gtk4::ResponseType::Accept {
                        // `connect_destroy` saves the geometry.
                        win.destroy();
                    }
                });
                dialog.show();
                gtk4::Inhibit(true)
            } else {
                save_window_geometry(win);
                gtk4::Inhibit(false)
            }
        });
    }

    window.set_titlebar(Some(&header));
    window.set_child(Some(&main_box));

    window.connect_destroy(save_window_geometry);

    window.present();
}
