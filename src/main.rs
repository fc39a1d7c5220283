//! Crystal Puzzle entry point
//!
//! The browser build is driven through `crystal_puzzle::web::WebGame`; the
//! native binary is a terminal front-end with an autoplay demo.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};

    use crystal_puzzle::HighScores;
    use crystal_puzzle::consts::GRID_SIZE;
    use crystal_puzzle::now_ms;
    use crystal_puzzle::persistence::{FileStorage, SaveManager};
    use crystal_puzzle::platform::{LocalPlatform, Platform, Reward};
    use crystal_puzzle::sim::{
        Command, GameEvent, GamePhase, GameState, MoveError, step, suggest_move,
    };

    const SAVE_DIR: &str = ".crystal-puzzle";
    const USAGE: &str = "usage: crystal-puzzle [play|demo] [--seed N]";
    const HELP: &str = "commands: p <slot> <x> <y> place | h hammer on/off | x <x> <y> fire hammer | s shuffle | r restart | q quit";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Play,
        Demo,
    }

    struct Options {
        mode: Mode,
        seed: u64,
    }

    fn parse_args(args: &[String]) -> Result<Options, String> {
        let mut mode = Mode::Play;
        let mut seed = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "play" => mode = Mode::Play,
                "demo" => mode = Mode::Demo,
                "--seed" => {
                    let value = iter.next().ok_or("--seed needs a value")?;
                    seed = Some(value.parse().map_err(|_| format!("bad seed: {}", value))?);
                }
                other => return Err(format!("unknown argument: {}", other)),
            }
        }
        Ok(Options {
            mode,
            seed: seed.unwrap_or_else(now_ms),
        })
    }

    /// Parse one line of player input. `Ok(None)` means quit.
    fn parse_command(line: &str) -> Result<Option<Command>, String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let num = |i: usize| -> Result<i32, String> {
            parts
                .get(i)
                .ok_or_else(|| HELP.to_string())?
                .parse()
                .map_err(|_| format!("not a number: {}", parts[i]))
        };
        let command = match parts.first().copied() {
            Some("p") => Command::Place {
                slot: num(1)?.max(0) as usize,
                x: num(2)?,
                y: num(3)?,
            },
            Some("h") => Command::ArmHammer,
            Some("x") => Command::Hammer {
                x: num(1)?,
                y: num(2)?,
            },
            Some("s") => Command::Shuffle,
            Some("r") => Command::Restart,
            Some("q") => return Ok(None),
            _ => return Err(HELP.to_string()),
        };
        Ok(Some(command))
    }

    fn render(state: &GameState) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "score {}  best {}  streak {}\n",
            state.score, state.best_score, state.combo_streak
        ));
        out.push_str("   ");
        for x in 0..GRID_SIZE {
            out.push_str(&format!("{} ", x));
        }
        out.push('\n');
        for (y, row) in state.grid.rows().enumerate() {
            out.push_str(&format!("{}  ", y));
            for cell in row {
                out.push(cell.map(|c| c.glyph()).unwrap_or('.'));
                out.push(' ');
            }
            out.push('\n');
        }
        let fits = state.tray_fit_mask();
        for (slot, piece) in state.tray.iter().enumerate() {
            match piece {
                Some(p) => out.push_str(&format!(
                    "[{}] {} {}{}\n",
                    slot,
                    p.shape().name,
                    p.color.as_str(),
                    if fits[slot] { "" } else { " (no room)" }
                )),
                None => out.push_str(&format!("[{}] -\n", slot)),
            }
        }
        match state.phase {
            GamePhase::HammerArmed => out.push_str("hammer armed: x <x> <y>\n"),
            GamePhase::GameOver => out.push_str("GAME OVER - r to restart, q to quit\n"),
            GamePhase::Playing => {}
        }
        out
    }

    fn describe(event: &GameEvent) -> Option<String> {
        match event {
            GameEvent::LinesCleared {
                lines,
                points,
                streak,
                feedback,
                ..
            } => Some(format!(
                "{} line(s) cleared, +{} (streak {}, {:?})",
                lines.count(),
                points,
                streak,
                feedback
            )),
            GameEvent::HammerBlast {
                destroyed, points, ..
            } => Some(format!("hammer smashed {} block(s), +{}", destroyed, points)),
            GameEvent::NewRecord { score } => Some(format!("new record: {}", score)),
            GameEvent::GameOver { score, best } => {
                Some(format!("game over: score {}, best {}", score, best))
            }
            _ => None,
        }
    }

    struct Session {
        state: GameState,
        saves: SaveManager<FileStorage, LocalPlatform>,
        high_scores: HighScores,
    }

    impl Session {
        fn open(seed: u64) -> Result<Self, String> {
            let storage = FileStorage::open(SAVE_DIR).map_err(|e| e.to_string())?;
            let mut saves = SaveManager::new(storage, LocalPlatform::new());
            let best = saves.load_best();
            let high_scores = HighScores::load(&saves.storage);
            log::info!("Starting with seed {} (best {})", seed, best);
            Ok(Self {
                state: GameState::with_best(seed, best),
                saves,
                high_scores,
            })
        }

        fn apply(&mut self, command: Command) -> Result<Vec<GameEvent>, MoveError> {
            let granted = match command {
                Command::ArmHammer if self.state.phase == GamePhase::Playing => {
                    self.saves.platform.request_reward(Reward::Hammer)
                }
                Command::Shuffle if !self.state.is_over() => {
                    self.saves.platform.request_reward(Reward::Shuffle)
                }
                _ => true,
            };
            if !granted {
                return Ok(Vec::new());
            }

            step(&mut self.state, &command)?;
            let events = self.state.drain_events();
            for event in &events {
                if let GameEvent::GameOver { score, best } = *event {
                    self.on_game_over(score, best);
                }
            }
            Ok(events)
        }

        fn on_game_over(&mut self, score: u64, best: u64) {
            let now = now_ms();
            self.saves.on_game_over(best, now);
            if let Some(rank) =
                self.high_scores
                    .add_score(score, self.state.stats.lines_cleared, now)
            {
                println!("high score #{}!", rank);
                self.high_scores.save(&mut self.saves.storage);
            }
        }
    }

    fn play(session: &mut Session) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        println!("{}", HELP);
        print!("{}> ", render(&session.state));
        stdout.flush()?;

        for line in stdin.lock().lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(None) => break,
                Ok(Some(command)) => match session.apply(command) {
                    Ok(events) => {
                        for msg in events.iter().filter_map(describe) {
                            println!("{}", msg);
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                Err(msg) => println!("{}", msg),
            }
            print!("{}> ", render(&session.state));
            stdout.flush()?;
        }
        Ok(())
    }

    fn demo(session: &mut Session) {
        while let Some(command) = suggest_move(&session.state) {
            match session.apply(command) {
                Ok(events) => {
                    for msg in events.iter().filter_map(describe) {
                        println!("{}", msg);
                    }
                }
                Err(e) => {
                    log::warn!("Autoplay move rejected: {}", e);
                    break;
                }
            }
        }
        print!("{}", render(&session.state));
        println!(
            "{} moves, {} lines, {} blocks, best streak {}",
            session.state.stats.moves,
            session.state.stats.lines_cleared,
            session.state.stats.blocks_placed,
            session.state.stats.best_streak
        );
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let options = parse_args(&args).map_err(|e| format!("{}\n{}", e, USAGE))?;
        let mut session = Session::open(options.seed)?;
        match options.mode {
            Mode::Play => play(&mut session).map_err(|e| e.to_string()),
            Mode::Demo => {
                demo(&mut session);
                Ok(())
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = terminal::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebGame, this is just to satisfy the compiler
}
