//! Chronological bucket allocation of consumed days across purchase orders.

use chrono::{Duration, NaiveDate};

use suivy_domain::{
    ConsumptionSnapshot, DayMoment, EndEstimate, OrderReportRow, OrderState, Provider,
    PurchaseOrder, TeamRoster,
};

use crate::{calendar::BusinessCalendar, error::CoreError, projection::ProjectionService, Clock};

/// Walks a provider's orders in start-date order, spilling consumed days from
/// each order into the next, and projects completion for the open remainder.
pub struct AllocationService;

impl AllocationService {
    /// Builds report rows for one provider. Pure function of its inputs:
    /// identical inputs always produce identical rows.
    pub fn allocate(
        provider: &Provider,
        total_consumed_days: f64,
        reference: NaiveDate,
        calendar: &mut BusinessCalendar,
    ) -> Result<Vec<OrderReportRow>, CoreError> {
        if !provider.attendance_pct.is_finite() {
            return Err(CoreError::InvalidAttendanceRate(provider.attendance_pct));
        }

        let mut consumed_buffer = total_consumed_days;
        let mut rows = Vec::new();

        for order in provider.sorted_orders() {
            let ordered = order.ordered_days;
            let (state, consumed, estimate) = if consumed_buffer >= ordered {
                consumed_buffer -= ordered;
                (OrderState::Completed, ordered, EndEstimate::Closed)
            } else if consumed_buffer > 0.0 {
                let consumed = consumed_buffer;
                consumed_buffer = 0.0;
                let estimate = Self::project_from_reference(
                    calendar,
                    reference,
                    ordered - consumed,
                    provider.attendance_pct,
                );
                (OrderState::InProgress, consumed, estimate)
            } else {
                let estimate = match order.start_date {
                    // A genuinely future order burns from its own start slot.
                    Some(start) if start > reference => ProjectionService::project(
                        calendar,
                        start,
                        order.start_moment,
                        ordered,
                        provider.attendance_pct,
                    ),
                    // Nominally started (or undated) with nothing consumed:
                    // work resumes from the day after the analysis date.
                    _ => Self::project_from_reference(
                        calendar,
                        reference,
                        ordered,
                        provider.attendance_pct,
                    ),
                };
                (OrderState::Future, 0.0, estimate)
            };

            rows.push(Self::row(provider, order, state, consumed, estimate));
        }

        Ok(rows)
    }

    /// Builds the whole team's report: per-provider rows concatenated, with
    /// each provider's total consumed days resolved from the snapshot.
    pub fn report(
        roster: &TeamRoster,
        consumption: &ConsumptionSnapshot,
        reference: NaiveDate,
        calendar: &mut BusinessCalendar,
    ) -> Result<Vec<OrderReportRow>, CoreError> {
        let mut rows = Vec::new();
        for provider in &roster.providers {
            let total = consumption.total_for(provider.id);
            rows.extend(Self::allocate(provider, total, reference, calendar)?);
        }
        Ok(rows)
    }

    /// Same as [`report`](Self::report), anchored on the clock's current date.
    pub fn report_as_of_today(
        roster: &TeamRoster,
        consumption: &ConsumptionSnapshot,
        clock: &dyn Clock,
        calendar: &mut BusinessCalendar,
    ) -> Result<Vec<OrderReportRow>, CoreError> {
        Self::report(roster, consumption, clock.today(), calendar)
    }

    fn project_from_reference(
        calendar: &mut BusinessCalendar,
        reference: NaiveDate,
        days_remaining: f64,
        attendance_pct: f64,
    ) -> EndEstimate {
        let day_after = reference
            .checked_add_signed(Duration::days(1))
            .unwrap_or(reference);
        ProjectionService::project(
            calendar,
            day_after,
            DayMoment::Morning,
            days_remaining,
            attendance_pct,
        )
    }

    fn row(
        provider: &Provider,
        order: &PurchaseOrder,
        state: OrderState,
        consumed: f64,
        estimate: EndEstimate,
    ) -> OrderReportRow {
        OrderReportRow {
            provider_id: provider.id,
            provider_name: provider.display_name(),
            company: provider.company.clone(),
            order_id: order.id,
            external_ref: order.external_ref.clone(),
            billing_ref: order.billing_ref.clone(),
            state,
            ordered_days: order.ordered_days,
            daily_rate: order.daily_rate,
            amount_ht: order.ordered_amount(),
            start_date: order.start_date,
            consumed_days: consumed,
            remaining_days: order.ordered_days - consumed,
            estimated_end: estimate,
            unit_orders: order.unit_orders.clone(),
        }
    }
}
