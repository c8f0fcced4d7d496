//! Multiplexing loop with jitter compensation
//!
//! One pass visits every position once:
//!
//! ```text
//! ┌── position p ─────────────────────────────┐
//! │ raise lines │ bright hold │ lower │ dim hold │ after-image gap │ ... next p
//! └───────────────────────────────────────────┘
//! ```
//!
//! The time spent writing pins is measured and taken off the following
//! hold. After the last position the frame source is polled; the time that
//! takes is taken off the final gap, so a pass lasts about
//! `N * (frame_period + after_image)` whether or not a swap happened.
//! A step that overruns its budget just gets no hold; the loop never stops.
//!
//! A position whose digit is off is skipped entirely (no BCD write, no
//! anode) unless it carries a comma. The comma cathodes sit inside the tube,
//! so a comma-only position still raises its anode and writes the blank
//! pattern `0xF`, which lights no numeral. This departs from "anode only
//! for a number"; without it a comma on a blank digit could never light.

use embedded_hal::delay::DelayNs;
use nixie_hal::{Clock, Micros, OutputPin};

use super::lines::DisplayLines;
use crate::config::{ConfigError, DigitCount, DisplayConfig};
use crate::curve::DutyCurve;
use crate::decoder::IntroMode;
use crate::frame::{ActiveFrame, BLANK_BCD};
use crate::intro::IntroAnimation;
use crate::traits::FrameSource;

/// What happened at the end of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassReport {
    /// A pending frame was promoted
    pub swapped: bool,
    /// The intro animation wrote the frame
    pub intro: bool,
    /// Time spent at the pass boundary (µs)
    pub boundary_us: Micros,
}

/// Multiplexing scheduler
pub struct Multiplexer<P, C, D, const N: usize> {
    lines: DisplayLines<P, N>,
    clock: C,
    delay: D,
    active: ActiveFrame<N>,
    curve: DutyCurve,
    intro: IntroAnimation<N>,
    frame_period_us: u16,
    after_image_us: u16,
}

impl<P, C, D, const N: usize> Multiplexer<P, C, D, N>
where
    P: OutputPin,
    C: Clock,
    D: DelayNs,
{
    /// Take ownership of the lines and drive them all low
    ///
    /// Fails if `config` has values the timing loop cannot run with.
    pub fn new(
        mut lines: DisplayLines<P, N>,
        clock: C,
        delay: D,
        config: &DisplayConfig,
    ) -> Result<Self, ConfigError> {
        let () = DigitCount::<N>::OK;
        lines.all_low();
        config.validate()?;
        Ok(Self {
            lines,
            clock,
            delay,
            active: ActiveFrame::blank(config.frame_period_us),
            curve: DutyCurve::new(config),
            intro: IntroAnimation::new(config.frame_period_us),
            frame_period_us: config.frame_period_us,
            after_image_us: config.after_image_us,
        })
    }

    /// Frame currently on the lamps
    pub fn active(&self) -> &ActiveFrame<N> {
        &self.active
    }

    pub fn lines(&self) -> &DisplayLines<P, N> {
        &self.lines
    }

    /// Multiplex forever
    pub fn run<S: FrameSource<N>>(mut self, mut source: S) -> ! {
        loop {
            self.run_pass(&mut source);
        }
    }

    /// One full pass over every position, ending at the swap point
    pub fn run_pass<S: FrameSource<N>>(&mut self, source: &mut S) -> PassReport {
        for position in 0..N {
            self.drive_position(position);
            if position + 1 < N {
                self.delay.delay_us(self.after_image_us as u32);
            }
        }

        let start = self.clock.now_us();
        let (swapped, intro) = self.pass_boundary(source);
        let boundary_us = self.clock.elapsed_since(start);
        self.hold(self.after_image_us, boundary_us);

        PassReport {
            swapped,
            intro,
            boundary_us,
        }
    }

    /// Swap in a pending frame or advance the intro
    fn pass_boundary<S: FrameSource<N>>(&mut self, source: &mut S) -> (bool, bool) {
        if let Some(pending) = source.take_frame() {
            self.active = ActiveFrame::from_pending(&pending, &self.curve);
            return (true, false);
        }

        match source.poll_intro() {
            IntroMode::Off => (false, false),
            IntroMode::Requested => {
                self.active = ActiveFrame::blank(self.frame_period_us);
                self.intro.restart();
                self.step_intro(source);
                (false, true)
            }
            IntroMode::Running => {
                if !self.intro.is_finished() {
                    self.step_intro(source);
                }
                (false, true)
            }
        }
    }

    fn step_intro<S: FrameSource<N>>(&mut self, source: &mut S) {
        if !self.intro.step(&mut self.active) {
            source.finish_intro();
        }
    }

    /// Light one position for its bright time, then dark for its dim time
    fn drive_position(&mut self, position: usize) {
        let address = N - 1 - position;
        let digit = self.active.digits[address];
        let timing = self.active.timings[address];
        let left = self.active.left_commas[address];
        let right = self.active.right_commas[address];
        let point = position < self.lines.points.len() && self.active.points[position];
        let anode = self.active.has_content(address);

        let start = self.clock.now_us();
        // An unlit position leaves the shared BCD lines alone: rewriting
        // them right after a lit position makes the powered-off lamp flash.
        match digit.bcd() {
            Some(pattern) => self.lines.write_bcd(pattern),
            None if anode => self.lines.write_bcd(BLANK_BCD),
            None => {}
        }
        if anode {
            self.lines.anodes[position].set_high();
        }
        if left {
            self.lines.left_comma.set_high();
        }
        if right {
            self.lines.right_comma.set_high();
        }
        if point {
            self.lines.points[position].set_high();
        }
        let spent = self.clock.elapsed_since(start);
        self.hold(timing.bright_us, spent);

        let start = self.clock.now_us();
        if anode {
            self.lines.anodes[position].set_low();
        }
        if left {
            self.lines.left_comma.set_low();
        }
        if right {
            self.lines.right_comma.set_low();
        }
        if point {
            self.lines.points[position].set_low();
        }
        let spent = self.clock.elapsed_since(start);
        self.hold(timing.dim_us, spent);
    }

    /// Wait out what is left of `budget_us` after `spent_us`
    fn hold(&mut self, budget_us: u16, spent_us: Micros) {
        let remaining = (budget_us as Micros).saturating_sub(spent_us);
        if remaining > 0 {
            self.delay.delay_us(remaining as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::frame::DigitValue;
    use crate::intro::{INTRO_DIGIT, INTRO_PASSES};
    use nixie_protocol::Command;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::vec::Vec;

    const DIGITS: usize = 4;

    /// Line identity for the event log
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Bcd(usize),
        Anode(usize),
        Point(usize),
        LeftComma,
        RightComma,
    }

    /// Shared virtual time plus a log of every pin write
    #[derive(Clone, Default)]
    struct Bench {
        now: Rc<Cell<u64>>,
        writes: Rc<RefCell<Vec<(u64, Line, bool)>>>,
        write_cost_us: Rc<Cell<u64>>,
    }

    impl Bench {
        fn advance(&self, us: u64) {
            self.now.set(self.now.get() + us);
        }

        fn clear_log(&self) {
            self.writes.borrow_mut().clear();
        }

        fn writes_to(&self, line: Line) -> Vec<bool> {
            self.writes
                .borrow()
                .iter()
                .filter(|(_, l, _)| *l == line)
                .map(|(_, _, high)| *high)
                .collect()
        }
    }

    struct MockPin {
        line: Line,
        high: bool,
        bench: Bench,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.record();
        }

        fn set_low(&mut self) {
            self.high = false;
            self.record();
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl MockPin {
        fn record(&mut self) {
            self.bench.advance(self.bench.write_cost_us.get());
            self.bench
                .writes
                .borrow_mut()
                .push((self.bench.now.get(), self.line, self.high));
        }
    }

    struct SimClock(Bench);

    impl Clock for SimClock {
        fn now_us(&self) -> Micros {
            self.0.now.get()
        }
    }

    struct SimDelay(Bench);

    impl DelayNs for SimDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.advance((ns / 1000) as u64);
        }

        fn delay_us(&mut self, us: u32) {
            self.0.advance(us as u64);
        }
    }

    /// Decoder wrapper whose swap costs a fixed amount of virtual time
    struct SlowSource {
        decoder: Decoder<DIGITS>,
        bench: Bench,
        swap_cost_us: u64,
    }

    impl FrameSource<DIGITS> for SlowSource {
        fn take_frame(&mut self) -> Option<crate::frame::PendingFrame<DIGITS>> {
            let frame = self.decoder.take_frame();
            if frame.is_some() {
                self.bench.advance(self.swap_cost_us);
            }
            frame
        }

        fn poll_intro(&mut self) -> IntroMode {
            self.decoder.poll_intro()
        }

        fn finish_intro(&mut self) {
            self.decoder.finish_intro()
        }
    }

    fn pin(bench: &Bench, line: Line) -> MockPin {
        MockPin {
            line,
            high: true,
            bench: bench.clone(),
        }
    }

    fn lines(bench: &Bench) -> DisplayLines<MockPin, DIGITS> {
        DisplayLines {
            bcd: core::array::from_fn(|i| pin(bench, Line::Bcd(i))),
            anodes: core::array::from_fn(|i| pin(bench, Line::Anode(i))),
            points: core::array::from_fn(|i| pin(bench, Line::Point(i))),
            left_comma: pin(bench, Line::LeftComma),
            right_comma: pin(bench, Line::RightComma),
        }
    }

    fn multiplexer(bench: &Bench) -> Multiplexer<MockPin, SimClock, SimDelay, DIGITS> {
        let mux = Multiplexer::new(
            lines(bench),
            SimClock(bench.clone()),
            SimDelay(bench.clone()),
            &DisplayConfig::default(),
        )
        .unwrap();
        bench.clear_log();
        mux
    }

    fn send(decoder: &mut Decoder<DIGITS>, cmds: &[Command]) {
        for cmd in cmds {
            decoder.handle_byte(cmd.to_byte());
        }
    }

    fn nominal_pass() -> u64 {
        DisplayConfig::default().pass_period_us(DIGITS) as u64
    }

    #[test]
    fn test_new_drives_all_low() {
        let bench = Bench::default();
        let mux = multiplexer(&bench);
        assert!(mux.lines().anodes.iter().all(|p| p.is_set_low()));
        assert!(mux.lines().bcd.iter().all(|p| p.is_set_low()));
        assert!(mux.lines().left_comma.is_set_low());
        assert_eq!(*mux.active(), ActiveFrame::blank(1000));
    }

    #[test]
    fn test_new_rejects_unusable_config() {
        let bench = Bench::default();
        let config = DisplayConfig {
            frame_period_us: 0,
            ..Default::default()
        };
        let result = Multiplexer::new(
            lines(&bench),
            SimClock(bench.clone()),
            SimDelay(bench.clone()),
            &config,
        );
        assert!(matches!(result, Err(ConfigError::ZeroFramePeriod)));
        // The lines still end up low
        assert!(!bench.writes.borrow().is_empty());
        assert!(bench.writes.borrow().iter().all(|(_, _, high)| !high));
    }

    #[test]
    fn test_pass_duration_without_swap() {
        let bench = Bench::default();
        bench.write_cost_us.set(3);
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::default();
        send(
            &mut decoder,
            &[
                Command::digit(0, 1),
                Command::Duty(7),
                Command::digit(3, 8),
                Command::Duty(7),
                Command::Finish,
            ],
        );
        mux.run_pass(&mut decoder);

        let start = bench.now.get();
        let report = mux.run_pass(&mut decoder);
        assert!(!report.swapped);
        assert_eq!(bench.now.get() - start, nominal_pass());
    }

    #[test]
    fn test_pass_duration_with_swap() {
        let bench = Bench::default();
        bench.write_cost_us.set(2);
        let mut mux = multiplexer(&bench);
        let mut source = SlowSource {
            decoder: Decoder::default(),
            bench: bench.clone(),
            swap_cost_us: 120,
        };
        send(
            &mut source.decoder,
            &[
                Command::digit(0, 1),
                Command::digit(1, 2),
                Command::Duty(4),
                Command::LeftComma(2),
                Command::Finish,
            ],
        );

        let start = bench.now.get();
        let report = mux.run_pass(&mut source);
        assert!(report.swapped);
        assert_eq!(report.boundary_us, 120);
        assert_eq!(bench.now.get() - start, nominal_pass());
    }

    #[test]
    fn test_swap_happens_only_at_pass_end() {
        let bench = Bench::default();
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::default();
        send(&mut decoder, &[Command::digit(3, 5), Command::Finish]);

        // The old (blank) frame is what this pass shows
        mux.run_pass(&mut decoder);
        assert!(bench.writes_to(Line::Anode(0)).is_empty());
        assert_eq!(mux.active().digits[3], DigitValue::Digit(5));

        // Address 3 is position 0 on a four-digit display
        bench.clear_log();
        mux.run_pass(&mut decoder);
        assert_eq!(bench.writes_to(Line::Anode(0)), [true, false]);
        assert!(bench.writes_to(Line::Anode(1)).is_empty());
    }

    #[test]
    fn test_off_position_leaves_bcd_alone() {
        let bench = Bench::default();
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::default();
        send(&mut decoder, &[Command::digit(3, 5), Command::Finish]);
        mux.run_pass(&mut decoder);

        bench.clear_log();
        mux.run_pass(&mut decoder);
        // Only position 0 writes the pattern: 5 = 0b0101
        assert_eq!(bench.writes_to(Line::Bcd(0)), [true]);
        assert_eq!(bench.writes_to(Line::Bcd(1)), [false]);
        assert_eq!(bench.writes_to(Line::Bcd(2)), [true]);
        assert_eq!(bench.writes_to(Line::Bcd(3)), [false]);
    }

    #[test]
    fn test_comma_only_position_blanks_pattern() {
        let bench = Bench::default();
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::default();
        send(&mut decoder, &[Command::RightComma(0), Command::Finish]);
        mux.run_pass(&mut decoder);

        bench.clear_log();
        mux.run_pass(&mut decoder);
        // Address 0 is the last position
        assert_eq!(bench.writes_to(Line::Anode(DIGITS - 1)), [true, false]);
        assert_eq!(bench.writes_to(Line::RightComma), [true, false]);
        assert!(bench.writes_to(Line::LeftComma).is_empty());
        for bit in 0..4 {
            assert_eq!(bench.writes_to(Line::Bcd(bit)), [true]);
        }
    }

    #[test]
    fn test_points_follow_first_two_positions() {
        let bench = Bench::default();
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::default();
        send(&mut decoder, &[Command::Point(1), Command::Finish]);
        mux.run_pass(&mut decoder);

        bench.clear_log();
        mux.run_pass(&mut decoder);
        assert_eq!(bench.writes_to(Line::Point(1)), [true, false]);
        assert!(bench.writes_to(Line::Point(0)).is_empty());
        // The point lamp needs no anode
        for position in 0..DIGITS {
            assert!(bench.writes_to(Line::Anode(position)).is_empty());
        }
    }

    #[test]
    fn test_bright_hold_matches_duty() {
        let bench = Bench::default();
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::default();
        send(
            &mut decoder,
            &[Command::digit(3, 1), Command::Duty(7), Command::Finish],
        );
        mux.run_pass(&mut decoder);

        bench.clear_log();
        mux.run_pass(&mut decoder);
        let log = bench.writes.borrow();
        let times: Vec<u64> = log
            .iter()
            .filter(|(_, line, _)| *line == Line::Anode(0))
            .map(|(t, _, _)| *t)
            .collect();
        assert_eq!(times.len(), 2);
        assert_eq!(times[1] - times[0], mux.curve.timing(7).bright_us as u64);
    }

    #[test]
    fn test_overrun_never_stalls() {
        let bench = Bench::default();
        bench.write_cost_us.set(2_000);
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::default();
        let digits: [Command; DIGITS] =
            core::array::from_fn(|a| Command::digit(a as u8, 8));
        send(&mut decoder, &digits);
        send(&mut decoder, &[Command::Duty(0), Command::Finish]);
        mux.run_pass(&mut decoder);

        // Writes alone exceed every budget; the pass still completes
        let report = mux.run_pass(&mut decoder);
        assert!(!report.swapped);
        assert!(bench.now.get() > nominal_pass());
    }

    #[test]
    fn test_intro_runs_then_hands_back() {
        let bench = Bench::default();
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::new(true);

        for _ in 0..INTRO_PASSES {
            assert!(mux.run_pass(&mut decoder).intro);
        }
        assert_eq!(decoder.intro_mode(), IntroMode::Off);
        assert_eq!(mux.active().digits, [DigitValue::Digit(INTRO_DIGIT); DIGITS]);
        assert!(!mux.run_pass(&mut decoder).intro);
    }

    #[test]
    fn test_command_interrupts_intro() {
        let bench = Bench::default();
        let mut mux = multiplexer(&bench);
        let mut decoder = Decoder::<DIGITS>::new(true);
        for _ in 0..10 {
            mux.run_pass(&mut decoder);
        }

        send(&mut decoder, &[Command::digit(0, 3), Command::Finish]);
        let report = mux.run_pass(&mut decoder);
        assert!(report.swapped);
        assert!(!report.intro);
        assert_eq!(mux.active().digits[0], DigitValue::Digit(3));
        assert_eq!(mux.active().digits[1], DigitValue::Off);
    }
}
