//! Tick orchestration
//!
//! The agent owns every driver and the dimming state; the bus is borrowed
//! per call. One tick is strictly sequential: statistics, frame, window
//! evaluation, lux gating. Blocking sensor conversions happen inside the
//! tick, so the tick period has to cover them (checked at config load).

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use statpanel_core::config::PanelConfig;
use statpanel_core::scheduler::{AutoDimmer, PowerCommand};
use statpanel_core::status::{StatusText, Throughput};
use statpanel_core::traits::{Canvas, Clock, FrameRenderer, CANVAS_LEN};
use statpanel_drivers::display::Ssd1306;
use statpanel_drivers::sensor::{Sht4x, Tsl2591};
use statpanel_netstats::{IfStats, NetifStats, StatsChannel};

use crate::config::ConfigLoadError;
use crate::error::{AgentError, InitStage, Subsystem, TickReport};
use crate::PanelBus;

/// Status panel agent
pub struct Agent<C, R, K, D> {
    config: PanelConfig,
    display: Ssd1306<D>,
    climate: Sht4x<D>,
    light: Tsl2591<D>,
    stats: NetifStats<C>,
    renderer: R,
    clock: K,
    dimmer: AutoDimmer,
    canvas: Box<Canvas>,
    /// Counters from the previous successful read
    previous: Option<IfStats>,
}

impl<C, R, K, D> Agent<C, R, K, D>
where
    C: StatsChannel,
    R: FrameRenderer,
    K: Clock,
    D: DelayNs + Clone,
{
    /// Bind a statistics reader to `config.interface`, then [`Agent::init`]
    ///
    /// An unknown or malformed interface name fails before the bus is
    /// touched.
    pub fn open<B: PanelBus>(
        bus: &mut B,
        config: PanelConfig,
        channel: C,
        renderer: R,
        clock: K,
        delay: D,
    ) -> Result<Self, AgentError> {
        config.validate().map_err(ConfigLoadError::from)?;

        let stats = NetifStats::new(channel, &config.interface)
            .map_err(|e| AgentError::init(InitStage::Stats, e))?;

        Self::init(bus, config, stats, renderer, clock, delay)
    }

    /// Bring up the bus and every peripheral
    ///
    /// Order: bus modes, activity LED off, display init, light sensor
    /// configuration, then a first counter read to prime the rates.
    /// Bus setup and display init failures are fatal; the LED, light
    /// configuration and priming read only log.
    pub fn init<B: PanelBus>(
        bus: &mut B,
        config: PanelConfig,
        stats: NetifStats<C>,
        renderer: R,
        clock: K,
        delay: D,
    ) -> Result<Self, AgentError> {
        config.validate().map_err(ConfigLoadError::from)?;

        bus.configure_i2c(config.bus.i2c)
            .map_err(|e| AgentError::init(InitStage::Bus, e))?;
        bus.configure_spi(config.bus.spi)
            .map_err(|e| AgentError::init(InitStage::Bus, e))?;

        if let Some(led) = config.bus.activity_led {
            // Driven high = LED off
            if let Err(e) = bus.write_pin(led, true, true) {
                warn!("activity LED err: {e:?}");
            }
        }

        let mut display = Ssd1306::new(config.display, delay.clone());
        display
            .init(bus)
            .map_err(|e| AgentError::init(InitStage::Display, e))?;
        info!("display initialized");

        let mut light = Tsl2591::new(delay.clone());
        if let Err(e) =
            light.set_gain_integration(bus, config.light.gain, config.light.integration)
        {
            warn!(
                "light sensor config err: {e:?}, lux uses {:?} / {} ms",
                light.gain(),
                light.integration().millis()
            );
        }

        let mut agent = Self {
            display,
            climate: Sht4x::new(delay),
            light,
            stats,
            renderer,
            clock,
            dimmer: AutoDimmer::new(config.dimming),
            canvas: Box::new([0; CANVAS_LEN]),
            previous: None,
            config,
        };

        match agent.stats.read() {
            Ok(stats) => agent.previous = Some(stats),
            Err(e) => warn!("initial stats read err: {e:?}"),
        }

        info!(
            "agent ready on {} (ifindex {})",
            agent.config.interface,
            agent.stats.ifindex()
        );
        Ok(agent)
    }

    /// Active configuration
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Dimming state
    pub fn dimmer(&self) -> &AutoDimmer {
        &self.dimmer
    }

    /// Display driver state
    pub fn display(&self) -> &Ssd1306<D> {
        &self.display
    }

    /// Run one iteration of the loop
    pub fn tick<B: PanelBus>(&mut self, bus: &mut B) -> TickReport {
        let mut report = TickReport::default();

        // A failed read skips the frame; the display keeps the old one
        match self.stats.read() {
            Ok(current) => {
                if self.dimmer.display_on() {
                    self.render_frame(bus, &current, &mut report);
                }
                self.previous = Some(current);
            }
            Err(e) => report.record(Subsystem::Stats, &e),
        }

        let evaluation = self.dimmer.evaluate(self.clock.now());
        if let Some(command) = evaluation.command {
            debug!("lux check window left, display back on");
            self.apply_power(bus, command, &mut report);
        }

        if evaluation.lux_check_active {
            match self.light.lux(bus) {
                Ok(lux) => {
                    report.lux = Some(lux);
                    if let Some(command) = self.dimmer.apply_lux(lux) {
                        debug!("lux {lux:.2}: display {command:?}");
                        self.apply_power(bus, command, &mut report);
                    }
                }
                Err(e) => report.record(Subsystem::Light, &e),
            }
        }

        report
    }

    /// Tick every `tick_interval_ms` until `stop` is set
    ///
    /// Ticks that overrun the period are not made up.
    pub fn run<B: PanelBus>(&mut self, bus: &mut B, stop: &AtomicBool) {
        let period = Duration::from_millis(u64::from(self.config.tick_interval_ms));
        let mut next = Instant::now() + period;

        info!("running, tick {} ms", self.config.tick_interval_ms);
        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            }
            if stop.load(Ordering::Relaxed) {
                break;
            }

            self.tick(bus);

            next += period;
            let now = Instant::now();
            if next <= now {
                next = now + period;
            }
        }
    }

    /// Turn the display off, then release the statistics channel
    ///
    /// The channel is closed even if the display command fails; the first
    /// error is returned.
    pub fn shutdown<B: PanelBus>(mut self, bus: &mut B) -> Result<(), AgentError> {
        let off = self.display.off(bus);
        let closed = self.stats.close();
        info!("display off, stats channel closed");

        off.map_err(|e| AgentError::Shutdown(format!("display off: {e:?}")))?;
        closed.map_err(|e| AgentError::Shutdown(format!("stats close: {e:?}")))
    }

    fn render_frame<B: PanelBus>(
        &mut self,
        bus: &mut B,
        current: &IfStats,
        report: &mut TickReport,
    ) {
        let rates = self
            .previous
            .map(|prev| current.delta(&prev))
            .unwrap_or_default();
        let tick_ms = u64::from(self.config.tick_interval_ms.max(1));

        let throughput = Throughput {
            rx_rate: rates.rx_bytes.saturating_mul(1000) / tick_ms,
            tx_rate: rates.tx_bytes.saturating_mul(1000) / tick_ms,
            rx_total: current.rx_bytes,
            tx_total: current.tx_bytes,
        };

        let climate = match self.climate.measure(bus) {
            Ok(climate) => Some(climate),
            Err(e) => {
                report.record(Subsystem::Climate, &e);
                None
            }
        };

        let text = StatusText::new(&throughput, climate.as_ref());
        self.renderer.render(&text, &mut self.canvas);

        match self.display.write(bus, &self.canvas[..]) {
            Ok(_) => report.rendered = true,
            Err(e) => report.record(Subsystem::Display, &e),
        }

        self.canvas.fill(0);
    }

    fn apply_power<B: PanelBus>(&mut self, bus: &mut B, command: PowerCommand, report: &mut TickReport) {
        let result = match command {
            PowerCommand::On => self.display.on(bus),
            PowerCommand::Off => self.display.off(bus),
        };

        match result {
            Ok(()) => report.power.push(command),
            Err(e) => report.record(Subsystem::Display, &e),
        }
    }
}

#[cfg(feature = "netlink")]
impl<R, K, D> Agent<statpanel_netstats::NetlinkChannel, R, K, D>
where
    R: FrameRenderer,
    K: Clock,
    D: DelayNs + Clone,
{
    /// Open a kernel statistics channel for `config.interface`, then
    /// [`Agent::init`]
    pub fn connect<B: PanelBus>(
        bus: &mut B,
        config: PanelConfig,
        renderer: R,
        clock: K,
        delay: D,
    ) -> Result<Self, AgentError> {
        config.validate().map_err(ConfigLoadError::from)?;

        let stats = NetifStats::open(&config.interface)
            .map_err(|e| AgentError::init(InitStage::Stats, e))?;

        Self::init(bus, config, stats, renderer, clock, delay)
    }
}
