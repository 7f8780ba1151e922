//! Integration tests for timesheet persistence, guarded transitions,
//! invoice payment and derived project spend.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use contractor_core::budget::{BudgetBand, BudgetUtilization};
use contractor_core::invoice::{InvoiceStatus, Payment};
use contractor_core::timesheet::{plan_transition, TimesheetAction, TimesheetStatus};
use contractor_db::models::contract::CreateContract;
use contractor_db::models::contractor::CreateContractor;
use contractor_db::models::engagement::CreateEngagement;
use contractor_db::models::invoice::{CreateInvoice, InvoiceFilter};
use contractor_db::models::organization::NewOwner;
use contractor_db::models::project::CreateProject;
use contractor_db::models::timesheet::{CreateTimesheet, TimeEntryInput, TimesheetFilter};
use contractor_db::repositories::{
    ContractRepo, ContractorRepo, EngagementRepo, InvoiceRepo, OrganizationRepo, ProjectRepo,
    TimesheetRepo,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct Fixture {
    org: i64,
    user: i64,
    project: i64,
    engagement: i64,
}

/// Organization with one contractor on one project at 50/hour.
async fn setup(pool: &PgPool, budget: Decimal) -> Fixture {
    let owner = NewOwner {
        email: "owner@flow.test".to_string(),
        full_name: "Owner".to_string(),
        password_hash: "hash".to_string(),
    };
    let (org, user) = OrganizationRepo::create_with_owner(pool, "Flow", &owner)
        .await
        .unwrap();

    let contractor = ContractorRepo::create(
        pool,
        org.id,
        &CreateContractor {
            supplier_id: None,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@flow.test".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();

    let contract = ContractRepo::create(
        pool,
        org.id,
        &CreateContract {
            contractor_id: contractor.id,
            supplier_id: None,
            title: "Compiler work".to_string(),
            rate: dec!(50),
            currency: None,
            start_date: date(2024, 1, 1),
            end_date: None,
            status: None,
        },
    )
    .await
    .unwrap();

    let project = ProjectRepo::create(
        pool,
        org.id,
        &CreateProject {
            name: "Compiler".to_string(),
            code: "COBOL".to_string(),
            description: None,
            budget: Some(budget),
            currency: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .unwrap();

    let engagement = EngagementRepo::create(
        pool,
        org.id,
        &CreateEngagement {
            contractor_id: contractor.id,
            project_id: project.id,
            contract_id: contract.id,
            role_title: "Engineer".to_string(),
            start_date: date(2024, 1, 1),
            end_date: None,
        },
    )
    .await
    .unwrap();

    Fixture {
        org: org.id,
        user: user.id,
        project: project.id,
        engagement: engagement.id,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(day: Option<u32>, hours: Decimal) -> TimeEntryInput {
    TimeEntryInput {
        date: day.map(|d| date(2024, 1, d)),
        hours,
        description: None,
    }
}

async fn create_timesheet(pool: &PgPool, fx: &Fixture, entries: Vec<TimeEntryInput>) -> i64 {
    let input = CreateTimesheet {
        engagement_id: fx.engagement,
        period_start: date(2024, 1, 1),
        period_end: date(2024, 1, 7),
        entries,
    };
    let (timesheet, _) = TimesheetRepo::create(pool, fx.org, fx.project, fx.user, &input)
        .await
        .unwrap();
    timesheet.id
}

/// Plan and persist `action` the way the API layer does.
async fn transition(
    pool: &PgPool,
    fx: &Fixture,
    id: i64,
    action: TimesheetAction,
) -> Option<TimesheetStatus> {
    let timesheet = TimesheetRepo::find_by_id(pool, fx.org, id)
        .await
        .unwrap()
        .unwrap();
    let entries = TimesheetRepo::entries_for(pool, id).await.unwrap();
    let planned = plan_transition(
        timesheet.status,
        timesheet.period_start,
        timesheet.period_end,
        &entries,
        &action,
    )
    .unwrap();
    let reviewer = match action {
        TimesheetAction::Submit => None,
        _ => Some(fx.user),
    };
    TimesheetRepo::apply_transition(pool, fx.org, id, &planned, reviewer)
        .await
        .unwrap()
        .map(|t| t.status)
}

// ---------------------------------------------------------------------------
// Timesheets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_timesheet_with_ordered_entries(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let input = CreateTimesheet {
        engagement_id: fx.engagement,
        period_start: date(2024, 1, 1),
        period_end: date(2024, 1, 7),
        entries: vec![entry(Some(1), dec!(8)), entry(None, dec!(0)), entry(Some(2), dec!(4.5))],
    };
    let (timesheet, entries) = TimesheetRepo::create(&pool, fx.org, fx.project, fx.user, &input)
        .await
        .unwrap();

    assert_eq!(timesheet.status, TimesheetStatus::Draft);
    assert_eq!(timesheet.project_id, fx.project);
    assert_eq!(timesheet.created_by, Some(fx.user));
    assert_eq!(entries.len(), 3);
    let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    let reloaded = TimesheetRepo::entries_for(&pool, timesheet.id).await.unwrap();
    assert_eq!(reloaded[1].entry_date, None);
    assert_eq!(reloaded[2].hours, dec!(4.5));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_entries_only_while_draft(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let id = create_timesheet(&pool, &fx, vec![entry(Some(1), dec!(8))]).await;

    let replaced = TimesheetRepo::replace_entries(
        &pool,
        fx.org,
        id,
        &[entry(Some(2), dec!(6)), entry(Some(3), dec!(7))],
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(replaced.len(), 2);
    assert_eq!(TimesheetRepo::entries_for(&pool, id).await.unwrap().len(), 2);

    assert_eq!(
        transition(&pool, &fx, id, TimesheetAction::Submit).await,
        Some(TimesheetStatus::Submitted)
    );

    let result = TimesheetRepo::replace_entries(&pool, fx.org, id, &[])
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(TimesheetRepo::entries_for(&pool, id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_approval_sets_timestamps_and_reviewer(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let id = create_timesheet(&pool, &fx, vec![entry(Some(1), dec!(8))]).await;

    transition(&pool, &fx, id, TimesheetAction::Submit).await.unwrap();
    transition(&pool, &fx, id, TimesheetAction::Approve).await.unwrap();

    let timesheet = TimesheetRepo::find_by_id(&pool, fx.org, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(timesheet.status, TimesheetStatus::Approved);
    assert!(timesheet.submitted_at.is_some());
    assert!(timesheet.approved_at.is_some());
    assert!(timesheet.rejected_at.is_none());
    assert_eq!(timesheet.reviewed_by, Some(fx.user));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_stores_reason(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let id = create_timesheet(&pool, &fx, vec![entry(Some(1), dec!(8))]).await;

    transition(&pool, &fx, id, TimesheetAction::Submit).await.unwrap();
    let status = transition(
        &pool,
        &fx,
        id,
        TimesheetAction::Reject {
            reason: "  Missing task codes ".to_string(),
        },
    )
    .await;
    assert_eq!(status, Some(TimesheetStatus::Rejected));

    let timesheet = TimesheetRepo::find_by_id(&pool, fx.org, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(timesheet.rejection_reason.as_deref(), Some("Missing task codes"));
    assert!(timesheet.rejected_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_transition_does_not_apply(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let id = create_timesheet(&pool, &fx, vec![entry(Some(1), dec!(8))]).await;
    transition(&pool, &fx, id, TimesheetAction::Submit).await.unwrap();

    // Two reviewers plan against the same SUBMITTED snapshot.
    let entries = TimesheetRepo::entries_for(&pool, id).await.unwrap();
    let approve = plan_transition(
        TimesheetStatus::Submitted,
        date(2024, 1, 1),
        date(2024, 1, 7),
        &entries,
        &TimesheetAction::Approve,
    )
    .unwrap();
    let reject = plan_transition(
        TimesheetStatus::Submitted,
        date(2024, 1, 1),
        date(2024, 1, 7),
        &entries,
        &TimesheetAction::Reject {
            reason: "No".to_string(),
        },
    )
    .unwrap();

    let first = TimesheetRepo::apply_transition(&pool, fx.org, id, &approve, Some(fx.user))
        .await
        .unwrap();
    assert_matches!(first, Some(t) if t.status == TimesheetStatus::Approved);

    let second = TimesheetRepo::apply_transition(&pool, fx.org, id, &reject, Some(fx.user))
        .await
        .unwrap();
    assert!(second.is_none());

    let timesheet = TimesheetRepo::find_by_id(&pool, fx.org, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(timesheet.status, TimesheetStatus::Approved);
    assert!(timesheet.rejection_reason.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_guard_rechecks_entries_in_database(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let id = create_timesheet(&pool, &fx, vec![entry(Some(1), dec!(8))]).await;

    let entries = TimesheetRepo::entries_for(&pool, id).await.unwrap();
    let submit = plan_transition(
        TimesheetStatus::Draft,
        date(2024, 1, 1),
        date(2024, 1, 7),
        &entries,
        &TimesheetAction::Submit,
    )
    .unwrap();

    // Entries are cleared after planning but before persisting.
    TimesheetRepo::replace_entries(&pool, fx.org, id, &[entry(None, dec!(0))])
        .await
        .unwrap()
        .unwrap();

    let result = TimesheetRepo::apply_transition(&pool, fx.org, id, &submit, None)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_export_rows(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let draft = create_timesheet(&pool, &fx, vec![entry(Some(1), dec!(8))]).await;
    let submitted = create_timesheet(
        &pool,
        &fx,
        vec![entry(Some(2), dec!(3)), entry(None, dec!(5))],
    )
    .await;
    transition(&pool, &fx, submitted, TimesheetAction::Submit).await.unwrap();

    let all = TimesheetRepo::list(&pool, fx.org, &TimesheetFilter::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let filter = TimesheetFilter {
        status: Some(TimesheetStatus::Draft),
        ..Default::default()
    };
    let drafts = TimesheetRepo::list(&pool, fx.org, &filter, 50, 0).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, draft);

    let filter = TimesheetFilter {
        project_id: Some(fx.project + 1000),
        ..Default::default()
    };
    assert!(TimesheetRepo::list(&pool, fx.org, &filter, 50, 0)
        .await
        .unwrap()
        .is_empty());

    let rows = TimesheetRepo::export_rows(&pool, fx.org).await.unwrap();
    assert_eq!(rows.len(), 2);
    let row = rows.iter().find(|r| r.id == submitted).unwrap();
    assert_eq!(row.project_code, "COBOL");
    assert_eq!(row.contractor_name, "Grace Hopper");
    // The undated 5 hours are excluded.
    assert_eq!(row.total_hours, dec!(3));
}

// ---------------------------------------------------------------------------
// Invoices and spend
// ---------------------------------------------------------------------------

fn new_invoice(fx: &Fixture, number: &str, amount: Decimal, timesheet: Option<i64>) -> CreateInvoice {
    CreateInvoice {
        project_id: fx.project,
        supplier_id: None,
        contractor_id: None,
        timesheet_id: timesheet,
        invoice_number: number.to_string(),
        amount,
        tax_amount: Some(dec!(10)),
        currency: None,
        issue_date: None,
        due_date: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invoice_submit_and_mark_paid(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    let invoice = InvoiceRepo::create(&pool, fx.org, &new_invoice(&fx, "INV-001", dec!(100), None))
        .await
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert_eq!(invoice.total_amount, dec!(110));

    let payment = Payment {
        paid_amount: dec!(110),
        payment_reference: "WIRE-42".to_string(),
    };
    // Not yet submitted.
    assert!(InvoiceRepo::mark_paid(&pool, fx.org, invoice.id, &payment, None)
        .await
        .unwrap()
        .is_none());

    let submitted = InvoiceRepo::submit(&pool, fx.org, invoice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submitted.status, InvoiceStatus::Submitted);
    assert!(submitted.submitted_at.is_some());
    assert!(InvoiceRepo::submit(&pool, fx.org, invoice.id).await.unwrap().is_none());

    let paid = InvoiceRepo::mark_paid(&pool, fx.org, invoice.id, &payment, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert_eq!(paid.paid_amount, Some(dec!(110)));
    assert_eq!(paid.payment_reference.as_deref(), Some("WIRE-42"));
    assert!(paid.paid_at.is_some());

    let filter = InvoiceFilter {
        project_id: Some(fx.project),
        status: Some(InvoiceStatus::Paid),
    };
    assert_eq!(InvoiceRepo::list(&pool, fx.org, &filter, 50, 0).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invoice_number_unique_per_organization(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;
    InvoiceRepo::create(&pool, fx.org, &new_invoice(&fx, "INV-7", dec!(1), None))
        .await
        .unwrap();
    let err = InvoiceRepo::create(&pool, fx.org, &new_invoice(&fx, "INV-7", dec!(2), None))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref e) if e.constraint() == Some("uq_invoices_org_number")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_spend_breakdown_combines_invoices_and_uninvoiced_timesheets(pool: PgPool) {
    let fx = setup(&pool, dec!(1000)).await;

    // Approved: 8 dated hours at 50 = 400. Undated hours never count.
    let approved = create_timesheet(
        &pool,
        &fx,
        vec![entry(Some(1), dec!(8)), entry(None, dec!(4))],
    )
    .await;
    transition(&pool, &fx, approved, TimesheetAction::Submit).await.unwrap();
    transition(&pool, &fx, approved, TimesheetAction::Approve).await.unwrap();

    // Submitted only: not spend yet.
    let pending = create_timesheet(&pool, &fx, vec![entry(Some(2), dec!(6))]).await;
    transition(&pool, &fx, pending, TimesheetAction::Submit).await.unwrap();

    // Draft invoice is not spend.
    let draft = InvoiceRepo::create(&pool, fx.org, &new_invoice(&fx, "D-1", dec!(500), None))
        .await
        .unwrap();

    let spend = ProjectRepo::spend_breakdown(&pool, fx.org, fx.project)
        .await
        .unwrap();
    assert_eq!(spend.invoiced, dec!(0));
    assert_eq!(spend.uninvoiced_timesheets, dec!(400));

    // A submitted invoice for the approved timesheet replaces its timesheet cost.
    let covering = InvoiceRepo::create(
        &pool,
        fx.org,
        &new_invoice(&fx, "T-1", dec!(390), Some(approved)),
    )
    .await
    .unwrap();
    InvoiceRepo::submit(&pool, fx.org, covering.id).await.unwrap().unwrap();
    InvoiceRepo::submit(&pool, fx.org, draft.id).await.unwrap().unwrap();

    let spend = ProjectRepo::spend_breakdown(&pool, fx.org, fx.project)
        .await
        .unwrap();
    assert_eq!(spend.invoiced, dec!(910));
    assert_eq!(spend.uninvoiced_timesheets, dec!(0));

    let report = BudgetUtilization::compute(dec!(1000), spend);
    assert_eq!(report.total_spent, dec!(910));
    assert_eq!(report.band, BudgetBand::Warning);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_spend_breakdown_for_empty_project_is_zero(pool: PgPool) {
    let fx = setup(&pool, dec!(0)).await;
    let spend = ProjectRepo::spend_breakdown(&pool, fx.org, fx.project)
        .await
        .unwrap();
    assert_eq!(spend.total(), Decimal::ZERO);

    let report = BudgetUtilization::compute(dec!(0), spend);
    assert_eq!(report.utilization_pct, Decimal::ZERO);
}
