use anyhow::{Context, Result};
use glam::{Mat4, Vec2};

use sprite_engine::core::{App, AppControl, FrameCtx, InitCtx};
use sprite_engine::input::{InputFrame, InputMapper, InputState, MovementInput};
use sprite_engine::render::{ShaderProgram, SpriteBinding, SpriteRenderer, Texture};
use sprite_engine::time::{FrameClock, SystemTicks, TickSource};
use sprite_engine::transform::{compose_model_matrix, ViewProjection};

use crate::config::GameConfig;
use crate::player::PlayerState;

/// Lifecycle of the loop. Never goes back to `Running`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppStatus {
    Running,
    Terminated,
}

/// Outcome of one [`GameLoop::step`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameStep {
    /// Draw the sprite with this model matrix.
    Draw(Mat4),
    Terminated,
}

/// The per-frame simulation: input, timing, position, model matrix.
///
/// Knows nothing about the GPU, so it runs under test with injected ticks.
pub struct GameLoop<S = SystemTicks> {
    status: AppStatus,
    player: PlayerState,
    clock: FrameClock<S>,
    mapper: InputMapper,
    sprite_scale: Vec2,
}

impl<S: TickSource> GameLoop<S> {
    pub fn new(config: &GameConfig, ticks: S) -> Self {
        Self {
            status: AppStatus::Running,
            player: PlayerState::new(config.speed),
            clock: FrameClock::new(ticks),
            mapper: InputMapper::new(config.bindings.clone()),
            sprite_scale: config.sprite_scale,
        }
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn clock(&self) -> &FrameClock<S> {
        &self.clock
    }

    /// Runs one frame.
    ///
    /// A termination signal ends the frame before the clock is read, so the
    /// last frame neither advances time nor moves the sprite.
    pub fn step(&mut self, input: &InputState, frame: &mut InputFrame) -> FrameStep {
        if self.status == AppStatus::Terminated {
            return FrameStep::Terminated;
        }

        let MovementInput {
            movement,
            terminate,
        } = self.mapper.poll(input, frame);

        if terminate {
            self.status = AppStatus::Terminated;
            log::info!(
                "terminating at {:?}, last movement {:?}",
                self.player.position,
                self.player.movement
            );
            return FrameStep::Terminated;
        }

        let ft = self.clock.tick();
        if ft.frame_index == 0 {
            log::debug!("first frame {:.3}s after loading", ft.seconds);
        }
        self.player.advance(movement, ft.dt);

        FrameStep::Draw(compose_model_matrix(self.player.position, self.sprite_scale))
    }
}

struct Scene {
    game: GameLoop,
    program: ShaderProgram,
    renderer: SpriteRenderer,
    texture: Texture,
    binding: SpriteBinding,
}

/// The application: one textured sprite steered with the keyboard.
pub struct SpriteApp {
    config: GameConfig,
    clear: wgpu::Color,
    scene: Option<Scene>,
}

impl SpriteApp {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            clear: wgpu::Color::BLACK,
            scene: None,
        }
    }
}

impl App for SpriteApp {
    fn init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        let rctx = ctx.render_ctx();
        let cfg = &self.config;

        let program = ShaderProgram::load(&rctx, &cfg.vertex_shader, &cfg.fragment_shader)
            .context("failed to build sprite shader program")?;

        let texture =
            Texture::load(&rctx, &cfg.sprite_path).context("failed to load sprite texture")?;

        // View and projection never change; upload them once.
        program.set_view_projection(rctx.queue, &ViewProjection::orthographic(cfg.projection));

        let renderer =
            SpriteRenderer::new(&rctx, &program).context("failed to build sprite pipeline")?;
        let binding = renderer.bind_texture(&rctx, &program, &texture);
        log::debug!("sprite bound to texture {}", texture.id());

        self.clear = cfg.clear_color(rctx.surface_format);

        // Timing starts once loading is done.
        let game = GameLoop::new(cfg, SystemTicks::new());

        self.scene = Some(Scene {
            game,
            program,
            renderer,
            texture,
            binding,
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Exit;
        };

        match scene.game.step(ctx.input, ctx.input_frame) {
            FrameStep::Terminated => AppControl::Exit,
            FrameStep::Draw(model) => {
                let Scene {
                    program,
                    renderer,
                    binding,
                    ..
                } = scene;

                ctx.render(self.clear, |rctx, target| {
                    program.set_model_matrix(rctx.queue, &model);
                    renderer.draw(target, program, binding);
                })
            }
        }
    }

    fn shutdown(&mut self) {
        let Some(scene) = self.scene.take() else {
            return;
        };
        let Scene {
            game,
            program,
            renderer,
            texture,
            binding,
        } = scene;

        log::info!(
            "sprite stopped at ({:.3}, {:.3}) after {:.2}s, loop {:?}",
            game.player().position.x,
            game.player().position.y,
            game.clock().previous_seconds(),
            game.status()
        );

        drop(binding);
        texture.release();
        drop(renderer);
        drop(program);
    }
}
