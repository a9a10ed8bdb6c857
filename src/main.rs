//! Folio Arcade entry point
//!
//! The browser build starts from `platform::web`. Natively this binary runs a
//! short headless session through every game and the gravity stage, logging
//! what happens (`RUST_LOG=debug` for ignored inputs).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Folio Arcade (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Seed: {seed}");

    demo::arcade(seed);
    demo::gravity();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use folio_arcade::arcade::{Arcade, GameInput, GameKind};
    use folio_arcade::games::Choice;
    use folio_arcade::physics::{ElementRect, GravityStage, Viewport};
    use folio_arcade::settings::Settings;

    /// Frame length the demo pretends the browser runs at
    const FRAME_MS: u64 = 16;

    fn run_for(arcade: &mut Arcade, ms: u64) {
        let mut elapsed = 0;
        while elapsed < ms {
            arcade.advance(FRAME_MS);
            elapsed += FRAME_MS;
        }
    }

    fn show(arcade: &Arcade) {
        if let Some(frame) = arcade.frame() {
            log::info!("[{}] {}", frame.title, frame.status);
        }
    }

    pub fn arcade(seed: u64) {
        let mut arcade = Arcade::new();
        for kind in Arcade::catalog() {
            log::info!("{} - {}", kind.title(), kind.description());
        }

        arcade.launch(GameKind::TicTacToe, seed);
        for slot in [4, 0, 2, 6, 3, 5, 1, 7, 8] {
            arcade.handle(GameInput::Cell(slot));
        }
        show(&arcade);

        arcade.launch(GameKind::Snake, seed);
        arcade.handle(GameInput::Start);
        run_for(&mut arcade, 1_000);
        arcade.handle(GameInput::Key("ArrowLeft".into()));
        run_for(&mut arcade, 3_000);
        show(&arcade);

        arcade.launch(GameKind::Memory, seed);
        for i in 0..12 {
            arcade.handle(GameInput::Cell(i));
            run_for(&mut arcade, 1_000);
        }
        show(&arcade);

        arcade.launch(GameKind::Whack, seed);
        arcade.handle(GameInput::Start);
        for _ in 0..30 {
            run_for(&mut arcade, 1_000);
            arcade.handle(GameInput::Cell(4));
        }
        show(&arcade);

        arcade.launch(GameKind::Rps, seed);
        arcade.handle(GameInput::Choice(Choice::Rock));
        run_for(&mut arcade, 1_100);
        show(&arcade);

        arcade.launch(GameKind::Sudoku, seed);
        arcade.handle(GameInput::Cell(2));
        arcade.handle(GameInput::Key("4".into()));
        show(&arcade);

        arcade.launch(GameKind::Typing, seed);
        arcade.handle(GameInput::Text("The quick".into()));
        show(&arcade);
        arcade.close();
    }

    pub fn gravity() {
        let settings = Settings {
            gravity_on_start: true,
            ..Settings::load()
        };
        let mut stage = GravityStage::new(&settings);
        stage.init(Viewport::new(1280.0, 720.0));

        let tiles = [
            ("hero", ElementRect::new(140.0, 80.0, 1000.0, 160.0)),
            ("about", ElementRect::new(140.0, 280.0, 480.0, 200.0)),
            ("projects", ElementRect::new(660.0, 280.0, 480.0, 200.0)),
        ];
        for (id, rect) in tiles {
            stage.register_element(id.into(), rect, None);
        }

        for _ in 0..180 {
            stage.frame(1.0 / 60.0);
        }
        for (id, transform) in stage.transforms() {
            log::info!("{} -> {}", id.0, transform.to_css());
        }
        stage.teardown();
    }
}
