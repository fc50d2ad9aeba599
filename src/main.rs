//! Memory Lane entry point
//!
//! Handles platform-specific initialization and drives the engine from browser
//! events and the animation-frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_shell {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent, MouseEvent};

    use memory_lane::audio::AudioManager;
    use memory_lane::consts::*;
    use memory_lane::content::PHOTOS;
    use memory_lane::games::{GameView, format_date};
    use memory_lane::persistence::LocalStorage;
    use memory_lane::platform::{self, by_id, element, set_hidden, set_hidden_id, set_text};
    use memory_lane::{CardStatus, DevOptions, EngineEvent, GameEngine, GameId, Navigation, Screen};

    /// Engine plus the browser-only pieces around it
    struct Shell {
        engine: GameEngine,
        audio: AudioManager,
    }

    type SharedShell = Rc<RefCell<Shell>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Memory Lane starting...");

        let Some(document) = platform::document() else {
            log::error!("No document, nothing to run");
            return;
        };

        let storage = Rc::new(LocalStorage::new());
        let dev = DevOptions::load(storage.as_ref(), platform::is_dev_environment());
        let seed = js_sys::Date::now() as u64;
        let engine = GameEngine::new(storage, dev, seed);
        let audio = AudioManager::new(engine.settings());
        log::info!("Engine initialized with seed: {}", seed);

        let shell = Rc::new(RefCell::new(Shell { engine, audio }));
        update_love_meter(&shell.borrow().engine);
        update_test_mode_badge(dev.test_mode);

        setup_hash_listener(shell.clone());
        setup_click_handler(&document, shell.clone());
        setup_keyboard(shell.clone());
        schedule_loading_finish(shell.clone());

        request_animation_frame(shell);
        log::info!("Memory Lane running!");
    }

    fn setup_hash_listener(shell: SharedShell) {
        let Some(window) = platform::window() else { return };
        platform::listen(&window, "hashchange", move |_event: web_sys::HashChangeEvent| {
            let path = platform::location_path();
            shell.borrow_mut().engine.on_hash_change(&path);
            flush(&shell);
        });
    }

    /// Loading screen stays up for a moment, then the initial hash resolves
    fn schedule_loading_finish(shell: SharedShell) {
        platform::after(LOADING_DELAY_MS, move || {
            set_hidden_id("loading-screen", true);
            let greeting = {
                let mut s = shell.borrow_mut();
                s.engine.finish_loading(&platform::location_path());
                s.engine.welcome_back()
            };
            if let Some(greeting) = greeting {
                platform::toast(&greeting, "save-indicator welcome-back", NOTICE_MS);
            }
            flush(&shell);
        });
    }

    /// One delegated listener: `data-action`, `data-game` and `data-choice`
    fn setup_click_handler(document: &web_sys::Document, shell: SharedShell) {
        platform::listen(document, "click", move |event: MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if let Some(el) = target.closest("[data-choice]").ok().flatten() {
                let index = el
                    .get_attribute("data-choice")
                    .and_then(|v| v.parse::<usize>().ok());
                if let Some(index) = index {
                    shell.borrow_mut().engine.choose(index);
                }
            } else if let Some(el) = target.closest("[data-game]").ok().flatten() {
                let game = el.get_attribute("data-game").and_then(|g| GameId::from_str(&g));
                if let Some(game) = game {
                    shell.borrow_mut().engine.go_to_game(game);
                }
            } else if let Some(el) = target.closest("[data-action]").ok().flatten() {
                let action = el.get_attribute("data-action").unwrap_or_default();
                run_action(&shell, &action);
            } else {
                return;
            }
            flush(&shell);
        });
    }

    fn run_action(shell: &SharedShell, action: &str) {
        let mut s = shell.borrow_mut();
        let s = &mut *s;
        match action {
            "home" => s.engine.go_home(),
            "games" => s.engine.go_to_games(),
            "slideshow" => s.engine.go_to_slideshow(),
            "gallery" => s.engine.go_to_gallery(),
            "close-token" => {
                set_hidden_id("token-modal", true);
                s.engine.close_token_modal();
            }
            "restart" => {
                let confirmed = platform::window()
                    .and_then(|w| {
                        w.confirm_with_message(
                            "Are you sure you want to restart the game? All progress will be lost.",
                        )
                        .ok()
                    })
                    .unwrap_or(false);
                if confirmed {
                    s.engine.restart();
                }
            }
            "toggle-mute" => {
                let muted = s.engine.toggle_mute();
                s.audio.apply_settings(s.engine.settings());
                set_text("mute-btn", if muted { "🔇" } else { "🔊" });
            }
            other => log::warn!("Unknown action: {}", other),
        }
    }

    fn setup_keyboard(shell: SharedShell) {
        let Some(window) = platform::window() else { return };
        platform::listen(&window, "keydown", move |event: KeyboardEvent| {
            let handled = shell.borrow_mut().engine.key_down(
                &event.key(),
                event.alt_key(),
                event.shift_key(),
            );
            if handled {
                event.prevent_default();
                flush(&shell);
            }
        });
    }

    fn request_animation_frame(shell: SharedShell) {
        let Some(window) = platform::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(shell, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(shell: SharedShell, time: f64) {
        shell.borrow_mut().engine.tick(time);
        flush(&shell);
        request_animation_frame(shell);
    }

    /// Apply every pending engine event to the page
    fn flush(shell: &SharedShell) {
        let events = shell.borrow_mut().engine.drain_events();
        if events.is_empty() {
            return;
        }
        let s = shell.borrow();
        for event in events {
            match event {
                EngineEvent::Navigated(nav) => show_navigation(&s.engine, &nav),
                EngineEvent::UnlockDenied { message, .. } => {
                    platform::toast(&format!("🔒 {}", message), "route-notification", NOTICE_MS);
                }
                EngineEvent::GameStarted(id) | EngineEvent::GameUpdated(id) => {
                    if let Some(view) = s.engine.view() {
                        render_game(id, &view);
                    }
                }
                EngineEvent::GameFinished { game, summary } => {
                    if let Some(el) = game_part(game, ".game-summary") {
                        el.set_text_content(Some(&summary));
                        set_hidden(&el, false);
                    }
                }
                EngineEvent::TokenUnlocked {
                    token,
                    message,
                    photo,
                    ..
                } => show_token(token, message, photo.src),
                EngineEvent::ProgressSaved { .. } => {
                    update_love_meter(&s.engine);
                    platform::toast("💾 Progress saved", "save-indicator", SAVE_INDICATOR_MS);
                }
                EngineEvent::Cue(cue) => s.audio.play(cue),
                EngineEvent::TestModeChanged(enabled) => {
                    update_test_mode_badge(enabled);
                    render_cards(&s.engine);
                    let text = if enabled {
                        "🧪 Test mode enabled: all games unlocked"
                    } else {
                        "Test mode disabled"
                    };
                    platform::toast(text, "route-notification", NOTICE_MS);
                }
                EngineEvent::ProgressReset => {
                    set_hidden_id("token-modal", true);
                    update_love_meter(&s.engine);
                }
            }
        }
    }

    fn show_navigation(engine: &GameEngine, nav: &Navigation) {
        if nav.push_history {
            platform::set_location_path(&nav.path);
        }
        if let Some(document) = platform::document() {
            document.set_title(&nav.title);
        }
        platform::show_screen(nav.screen.dom_id());
        render_breadcrumbs(engine);
        match nav.screen {
            Screen::Welcome => update_love_meter(engine),
            Screen::GameSelection => render_cards(engine),
            Screen::Game(id) => {
                if let Some(el) = game_part(id, ".game-summary") {
                    set_hidden(&el, true);
                }
            }
            Screen::Slideshow => render_photo_list("slideshow-track", "slide"),
            Screen::Gallery => render_photo_list("gallery-grid", "gallery-item"),
        }
    }

    fn render_breadcrumbs(engine: &GameEngine) {
        let Some(container) = by_id("breadcrumbs") else { return };
        container.set_inner_html("");
        let crumbs = engine.breadcrumbs();
        set_hidden(&container, crumbs.is_empty());
        let last = crumbs.len().saturating_sub(1);
        for (i, crumb) in crumbs.iter().enumerate() {
            let Some(link) = element("a", "breadcrumb", Some(&crumb.text)) else {
                continue;
            };
            let _ = link.set_attribute("href", &format!("#{}", crumb.path));
            let _ = container.append_child(&link);
            if i < last {
                if let Some(sep) = element("span", "breadcrumb-sep", Some("›")) {
                    let _ = container.append_child(&sep);
                }
            }
        }
    }

    fn render_cards(engine: &GameEngine) {
        let Some(document) = platform::document() else { return };
        for card in engine.game_cards() {
            let selector = format!("[data-game=\"{}\"]", card.id.as_str());
            let Some(el) = document.query_selector(&selector).ok().flatten() else {
                continue;
            };
            el.set_class_name(&format!("game-card {}", card.status.as_str()));
            if let Some(status) = el.query_selector(".game-status").ok().flatten() {
                status.set_text_content(Some(card.status.label()));
                status.set_class_name(&format!("game-status {}", card.status.as_str()));
            }
            if card.status == CardStatus::Locked {
                let _ = el.set_attribute("aria-disabled", "true");
            } else {
                let _ = el.remove_attribute("aria-disabled");
            }
        }
        set_hidden_id("view-gallery-btn", !engine.gallery_available());
        set_hidden_id("view-slideshow-btn", !engine.slideshow_available());
    }

    fn update_love_meter(engine: &GameEngine) {
        let progress = engine.progress();
        let percent = progress.love_percentage();
        if let Some(fill) = by_id("love-level-fill") {
            platform::set_style(&fill, &format!("width: {}%", percent));
        }
        set_text("love-percentage", &format!("{}%", percent));
        set_text(
            "memory-tokens",
            &format!("{}/{}", progress.memory_tokens(), progress.total_games()),
        );
    }

    fn update_test_mode_badge(enabled: bool) {
        set_hidden_id("test-mode-indicator", !enabled);
    }

    /// Element inside the screen of `game`
    fn game_part(game: GameId, selector: &str) -> Option<Element> {
        by_id(game.screen_id())?.query_selector(selector).ok().flatten()
    }

    fn render_game(id: GameId, view: &GameView) {
        if let Some(el) = game_part(id, ".game-prompt") {
            el.set_text_content(Some(&view.prompt));
        }
        if let Some(el) = game_part(id, ".game-status") {
            el.set_text_content(Some(&view.status));
        }
        if let Some(el) = game_part(id, ".game-image") {
            match view.image {
                Some(src) => {
                    let _ = el.set_attribute("src", src);
                    set_hidden(&el, false);
                }
                None => set_hidden(&el, true),
            }
        }
        if let Some(el) = game_part(id, ".game-feedback") {
            el.set_text_content(view.feedback.as_deref());
            set_hidden(&el, view.feedback.is_none());
        }
        let Some(container) = game_part(id, ".game-choices") else {
            return;
        };
        container.set_inner_html("");
        for (i, choice) in view.choices.iter().enumerate() {
            let Some(button) = element("button", choice.mark.css_class(), None) else {
                continue;
            };
            let _ = button.set_attribute("data-choice", &i.to_string());
            match (choice.image, choice.position) {
                // Puzzle tile: a slice of the photo
                (Some(src), Some((x, y))) => {
                    let _ = button.class_list().add_1("tile");
                    platform::set_style(
                        &button,
                        &format!(
                            "background-image: url('{}'); background-position: {}% {}%",
                            src, x, y
                        ),
                    );
                }
                (Some(src), None) => {
                    if let Some(img) = element("img", "choice-photo", None) {
                        let _ = img.set_attribute("src", src);
                        let _ = img.set_attribute("alt", &choice.label);
                        let _ = button.append_child(&img);
                    }
                }
                // Hotspot over the game image
                (None, Some((x, y))) => {
                    let _ = button.class_list().add_1("hotspot");
                    platform::set_style(&button, &format!("left: {}%; top: {}%", x, y));
                }
                (None, None) => {}
            }
            if !choice.label.is_empty() {
                if let Some(label) = element("span", "choice-label", Some(&choice.label)) {
                    let _ = button.append_child(&label);
                }
            }
            let _ = container.append_child(&button);
        }
    }

    fn show_token(token: u32, message: &str, photo_src: &str) {
        let Some(content) = by_id("token-content") else { return };
        content.set_inner_html("");
        if let Some(text) = element("div", "token-message", Some(message)) {
            let _ = content.append_child(&text);
        }
        if let Some(img) = element("img", "token-photo", None) {
            let _ = img.set_attribute("src", photo_src);
            let _ = img.set_attribute("alt", "Memory");
            let _ = content.append_child(&img);
        }
        let caption = format!(
            "Memory Token {}/{} Unlocked!",
            token,
            memory_lane::TOTAL_GAMES
        );
        if let Some(p) = element("p", "", Some(&caption)) {
            let _ = content.append_child(&p);
        }
        set_hidden_id("token-modal", false);
    }

    /// Every photo with its caption, oldest first
    fn render_photo_list(container_id: &str, class: &str) {
        let Some(container) = by_id(container_id) else { return };
        if container.child_element_count() > 0 {
            return;
        }
        let mut photos: Vec<_> = PHOTOS.iter().collect();
        photos.sort_by_key(|p| p.date);
        for photo in photos {
            let Some(item) = element("figure", class, None) else {
                continue;
            };
            if let Some(img) = element("img", "", None) {
                let _ = img.set_attribute("src", photo.src);
                let _ = img.set_attribute("alt", photo.moment);
                let _ = img.set_attribute("loading", "lazy");
                let _ = item.append_child(&img);
            }
            let caption = format!("{} · {}", photo.moment, format_date(photo.date));
            if let Some(cap) = element("figcaption", "", Some(&caption)) {
                let _ = item.append_child(&cap);
            }
            let _ = container.append_child(&item);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_shell::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Memory Lane (native) starting...");
    log::info!("The game runs in the browser - serve index.html with `trunk serve`");

    println!("\nWalking the unlock chain headlessly...");
    walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play every game to completion against in-memory storage
#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() {
    use std::rc::Rc;

    use memory_lane::persistence::MemoryStorage;
    use memory_lane::{DevOptions, EngineEvent, GameEngine, GameId};

    let storage = Rc::new(MemoryStorage::new());
    let mut engine = GameEngine::new(storage, DevOptions::production(), 42);
    engine.finish_loading("#/games/timeline");
    for event in engine.drain_events() {
        if let EngineEvent::UnlockDenied { message, .. } = event {
            println!("  {}", message);
        }
    }

    let mut clock = 0.0;
    for id in GameId::CATALOG {
        engine.go_to_game(id);
        let mut finished = false;
        // Mash choices until the run completes; timers are driven by a fake clock
        for round in 0..10_000 {
            let choices = engine.view().map(|v| v.choices.len()).unwrap_or(0);
            if choices > 0 {
                engine.choose(round % choices);
            }
            clock += 500.0;
            engine.tick(clock);
            for event in engine.drain_events() {
                match event {
                    EngineEvent::GameFinished { summary, .. } => {
                        println!("  {}: {}", id.title(), summary.lines().next().unwrap_or(""));
                        finished = true;
                    }
                    EngineEvent::TokenUnlocked { token, message, .. } => {
                        println!("    token {}: {}", token, message);
                    }
                    _ => {}
                }
            }
            if finished {
                break;
            }
        }
        if !finished {
            // Random clicking rarely solves the sliding puzzle
            println!("  {}: not solved by random play, marking complete", id.title());
            engine.complete_game(id);
            engine.drain_events();
        }
    }

    let progress = engine.progress();
    println!(
        "\nDone: {}/{} tokens, love level {}%, slideshow {}",
        progress.memory_tokens(),
        progress.total_games(),
        progress.love_percentage(),
        if engine.slideshow_available() { "unlocked" } else { "locked" }
    );
}
