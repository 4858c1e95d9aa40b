use anyhow::Result;
use colored::Colorize;
use hotelsim_core::{AssignmentRequest, Checkout, FrontDesk, StreamDraws, TicketTier};
use serde::Serialize;
use std::io::Write;

use crate::feed::RejectedLine;
use crate::play::TicketPlay;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub strategy: String,
    pub floors: u32,
    pub rooms: usize,
    pub assignments: Vec<AssignmentRow>,
    pub waiting: Vec<String>,
    pub rejected: Vec<RejectedRow>,
    pub checkouts: Vec<CheckoutRow>,
    pub free_rooms: usize,
    /// Random values consumed per stream; equal seeds give equal counts.
    pub rng_draws: StreamDraws,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRow {
    pub guest: String,
    pub room: String,
    pub room_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRow {
    pub room: String,
    pub guest: String,
    pub rating: u8,
    pub tier: TicketTier,
    pub discount: u32,
    pub code: String,
    pub play: TicketPlay,
}

impl RunReport {
    #[must_use]
    pub fn new(desk: &FrontDesk, seed: u64) -> Self {
        let hotel = desk.hotel();
        Self {
            seed,
            strategy: desk.strategy().label().to_string(),
            floors: hotel.floor_count(),
            rooms: hotel.rooms().count(),
            assignments: Vec::new(),
            waiting: Vec::new(),
            rejected: Vec::new(),
            checkouts: Vec::new(),
            free_rooms: hotel.available_rooms().len(),
            rng_draws: desk.rng_draws(),
        }
    }

    /// Capture the end-of-run hotel state.
    pub fn finish(&mut self, desk: &FrontDesk) {
        self.free_rooms = desk.hotel().available_rooms().len();
        self.rng_draws = desk.rng_draws();
    }

    pub fn record_assignments(&mut self, desk: &FrontDesk, requests: &[AssignmentRequest]) {
        self.assignments = requests
            .iter()
            .map(|request| AssignmentRow {
                guest: request.reservation.full_name(),
                room: request.room.clone(),
                room_type: desk
                    .hotel()
                    .room(&request.room)
                    .map(|room| room.room_type().label().to_string())
                    .unwrap_or_default(),
            })
            .collect();
        self.free_rooms = desk.hotel().available_rooms().len();
    }

    pub fn record_rejected(&mut self, rejected: &[RejectedLine]) {
        self.rejected = rejected
            .iter()
            .map(|line| RejectedRow {
                line_number: line.line_number,
                line: line.line.clone(),
                reason: line.error.to_string(),
            })
            .collect();
    }

    pub fn record_checkout(&mut self, checkout: &Checkout, play: TicketPlay) {
        self.checkouts.push(CheckoutRow {
            room: checkout.room.clone(),
            guest: checkout.guest.full_name(),
            rating: checkout.rating,
            tier: checkout.ticket.tier(),
            discount: checkout.ticket.discount(),
            code: checkout.ticket.code().to_string(),
            play,
        });
    }
}

pub fn generate_json_report(out: &mut dyn Write, report: &RunReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_console_report(out: &mut dyn Write, report: &RunReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🏨 Allocation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    writeln!(out, "Strategy: {}", report.strategy.bold())?;
    writeln!(out, "Seed: {}", report.seed)?;
    writeln!(
        out,
        "Floors: {} ({} rooms, {} free)",
        report.floors, report.rooms, report.free_rooms
    )?;
    writeln!(out)?;

    for row in &report.assignments {
        writeln!(
            out,
            "  {} {:10} {}",
            format!("{:6}", row.room).green(),
            row.room_type,
            row.guest
        )?;
    }
    if !report.waiting.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Waiting for a room:".yellow())?;
        for guest in &report.waiting {
            writeln!(out, "  • {guest}")?;
        }
    }
    if !report.rejected.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Rejected feed lines:".red())?;
        for row in &report.rejected {
            writeln!(out, "  line {}: {} ({})", row.line_number, row.line, row.reason)?;
        }
    }

    if !report.checkouts.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "🎟️  Checkout Rewards".bright_yellow().bold())?;
        writeln!(out, "{}", "===================".yellow())?;
        for row in &report.checkouts {
            let outcome = if row.play.won {
                "✅ WON".green()
            } else {
                "❌ LOST".red()
            };
            writeln!(
                out,
                "{} {} {} ticket {}% ({}), played {}: {}",
                row.room.bold(),
                row.guest,
                row.tier,
                row.discount,
                row.code,
                row.play.input,
                outcome
            )?;
        }
        let wins = report.checkouts.iter().filter(|row| row.play.won).count();
        writeln!(out, "Won {wins}/{} games", report.checkouts.len())?;
    }

    let draws = report.rng_draws;
    writeln!(out)?;
    writeln!(
        out,
        "{} assignment {}, reward {}, ticket {}",
        "RNG draws:".dimmed(),
        draws.assignment,
        draws.reward,
        draws.ticket
    )?;
    Ok(())
}
