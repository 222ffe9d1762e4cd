//! App: terminal init, main loop, key handling and engine event bookkeeping.

use crate::Args;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, Hud};
use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use log::{debug, info, warn};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use voxtris::{Bag, Engine, EngineConfig, Event, MoveOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    args: Args,
    config: EngineConfig,
    theme: Theme,
    engine: Engine,
    bag: Bag,
    screen: Screen,
    hud: Hud,
    quit: bool,
}

impl App {
    pub fn new(args: Args, config: EngineConfig, theme: Theme) -> Result<Self> {
        let engine = Engine::new(&config)?;
        let bag = Bag::new(args.bag_seed());
        let mut app = Self {
            args,
            config,
            theme,
            engine,
            bag,
            screen: Screen::Playing,
            hud: Hud::default(),
            quit: false,
        };
        app.deal();
        Ok(app)
    }

    /// Fresh grid and bag with the current config; stats reset.
    fn reset_game(&mut self) -> Result<()> {
        self.engine = Engine::new(&self.config)?;
        self.bag = Bag::new(self.args.bag_seed());
        self.screen = Screen::Playing;
        self.hud = Hud::default();
        self.deal();
        info!("new game on a {0}x{0}x{0} grid", self.config.grid_size);
        Ok(())
    }

    /// Spawn the next piece from the bag (replacing any active one).
    fn deal(&mut self) {
        let kind = self.bag.next();
        self.engine.spawn_piece(kind);
        self.hud.next = self.bag.peek();
        self.drain_events();
    }

    fn apply_action(&mut self, action: Action) -> Result<()> {
        match (self.screen, action) {
            (_, Action::Quit) => self.quit = true,
            (_, Action::Restart) => self.reset_game()?,
            (Screen::GameOver, _) | (_, Action::None) => {}
            (Screen::Playing, Action::Rotate(axis)) => {
                self.engine.rotate_piece(axis)?;
            }
            (Screen::Playing, Action::Skip) => self.deal(),
            (Screen::Playing, Action::Move(direction)) => {
                match self.engine.move_piece(direction)? {
                    MoveOutcome::Moved => {}
                    MoveOutcome::Rejected => debug!("move {direction:?} rejected"),
                    MoveOutcome::Placed(placement) => {
                        self.hud.pieces_placed += 1;
                        self.hud.layers_cleared += placement.cleared_layers.len() as u32;
                        self.drain_events();
                        if placement.topped_out() {
                            warn!(
                                "piece {} locked above the grid: {} block(s) lost",
                                placement.id,
                                placement.dropped.len()
                            );
                            self.screen = Screen::GameOver;
                            self.hud.message = "Stack overflow".to_string();
                            return Ok(());
                        }
                        self.deal();
                    }
                }
            }
        }
        self.drain_events();
        Ok(())
    }

    /// Log engine events and keep the last notable one for the sidebar.
    fn drain_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                Event::Spawned { id, kind } => debug!("spawned {} {id}", kind.name()),
                Event::Discarded { id } => {
                    info!("skipped piece {id}");
                    self.hud.message = format!("Skipped {id}");
                }
                Event::Placed { id, kind, cells } => {
                    info!("placed {} {id} at {} cell(s)", kind.name(), cells.len());
                    self.hud.message = format!("Placed {}", kind.name());
                }
                Event::LayerCleared { y, removed } => {
                    info!("layer y={y} cleared ({} blocks)", removed.len());
                    self.hud.message = format!("Layer {y} cleared!");
                }
                Event::PieceCleared { id } => debug!("piece {id} fully cleared"),
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                size,
            },
        };

        // Shrink the grid so every slice fits; the requested size is kept when it does.
        let (term_cols, term_rows) = size()?;
        let fit = ui::max_grid_size_for_terminal(term_cols, term_rows);
        if self.config.grid_size > fit {
            warn!(
                "grid size {} does not fit a {term_cols}x{term_rows} terminal, using {fit}",
                self.config.grid_size
            );
            self.config.grid_size = fit;
            self.reset_game()?;
        }

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.args.frame_rate.max(1.0));
        while !self.quit {
            let now = Instant::now();
            terminal.draw(|f| ui::draw(f, self.screen, &self.engine, &self.theme, &self.hud))?;

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let TermEvent::Key(key) = event::read()? {
                        // Held keys repeat at the OS rate; releases are ignored.
                        if key.kind == KeyEventKind::Release {
                            continue;
                        }
                        self.apply_action(key_to_action(key))?;
                        if self.quit {
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use voxtris::{Direction, EngineState, PieceKind};

    fn app(extra: &[&str]) -> App {
        let args = Args::try_parse_from(["voxtris", "--seed", "7"].iter().chain(extra)).unwrap();
        let config = EngineConfig {
            grid_size: args.size,
            spawn_height: args.spawn_height,
        };
        App::new(args, config, Theme::default()).unwrap()
    }

    #[test]
    fn test_new_deals_a_piece() {
        let app = app(&[]);
        assert_eq!(app.engine.state(), EngineState::PieceActive);
        assert!(app.hud.next.is_some());
        assert_eq!(app.screen, Screen::Playing);
    }

    #[test]
    fn test_skip_replaces_piece() {
        let mut app = app(&[]);
        let first = app.engine.current_piece().unwrap().id;
        app.apply_action(Action::Skip).unwrap();
        let second = app.engine.current_piece().unwrap().id;
        assert_ne!(first, second);
        assert_eq!(app.hud.message, format!("Skipped {first}"));
    }

    #[test]
    fn test_quit_sets_flag() {
        let mut app = app(&[]);
        app.apply_action(Action::Quit).unwrap();
        assert!(app.quit);
    }

    #[test]
    fn test_top_out_then_restart() {
        // One cell: the seed fills the grid, so the first placement locks above it.
        let mut app = app(&["--size", "1"]);
        app.engine.spawn_piece(PieceKind::Cube);
        for _ in 0..4 {
            app.apply_action(Action::Move(Direction::Down)).unwrap();
        }
        assert_eq!(app.screen, Screen::GameOver);
        assert_eq!(app.hud.pieces_placed, 1);

        // Moves are ignored until restart.
        app.apply_action(Action::Move(Direction::Down)).unwrap();
        assert_eq!(app.hud.pieces_placed, 1);

        app.apply_action(Action::Restart).unwrap();
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.hud.pieces_placed, 0);
        assert_eq!(app.engine.placed_pieces().len(), 1);
    }
}
