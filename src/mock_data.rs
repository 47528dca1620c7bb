// ABOUTME: Generators for the literal and randomized records served by the portal endpoints
// ABOUTME: Policies, customer profiles, account overviews, admin data, notifications and coverage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Mock Data
//!
//! Nothing here is persisted. Every call builds a fresh record, so two
//! searches over the same query return different holders and statuses.
//! The one exception is [`policy_by_id`], which seeds its generator from
//! the requested id so repeated lookups of one id agree.

use chrono::{Datelike, Duration, SecondsFormat, Utc};
use insurance_core::constants::policies::SEARCH_DATASET_SIZE;
use insurance_core::models::{Claims, PolicySummary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};

const STATUSES: [&str; 5] = ["Active", "Expired", "Pending", "Processing", "Approved"];
const COVERAGES: [&str; 5] = ["Auto", "Home", "Health", "Life", "Business"];
const FIRST_NAMES: [&str; 10] = [
    "John", "Jane", "Michael", "Sarah", "David", "Emily", "Robert", "Lisa", "James", "Maria",
];
const LAST_NAMES: [&str; 10] = [
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
];

/// Days ahead an expiry date may fall (about five years)
const MAX_EXPIRY_DAYS: i64 = 5 * 365;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn random_phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "+1-555-{}-{}",
        rng.gen_range(100..1000),
        rng.gen_range(1000..10_000)
    )
}

/// Generate `count` search records with sequential ids
#[must_use]
pub fn generate_policies(count: u32) -> Vec<PolicySummary> {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();

    (1..=count)
        .map(|id| PolicySummary {
            id,
            policy_number: format!("POL-{id:06}"),
            holder_name: format!(
                "{} {}",
                pick(&mut rng, &FIRST_NAMES),
                pick(&mut rng, &LAST_NAMES)
            ),
            status: pick(&mut rng, &STATUSES).to_owned(),
            coverage: pick(&mut rng, &COVERAGES).to_owned(),
            expires_on: today + Duration::days(rng.gen_range(0..=MAX_EXPIRY_DAYS)),
        })
        .collect()
}

/// The full search dataset, optionally filtered by a case-insensitive query
#[must_use]
pub fn search_policies(query: &str) -> Vec<PolicySummary> {
    let policies = generate_policies(SEARCH_DATASET_SIZE);
    if query.is_empty() {
        return policies;
    }
    let needle = query.to_lowercase();
    policies
        .into_iter()
        .filter(|policy| policy.matches(&needle))
        .collect()
}

/// Policy record of the fixed demo holder, PII included
#[must_use]
pub fn my_policy() -> Value {
    json!({
        "policyNumber": "INS-123456",
        "coverage": "Comprehensive",
        "premium": "$500",
        "expires": "2026-12-01",
        "type": "Auto",
        "status": "Active",
        "holderName": "John A. Smith",
        "insuredAmount": 500_000,
        "effectiveDate": "2024-01-01",
        "applicationDate": "2023-12-15",
        "dateOfBirth": "1985-03-15",
        "ssn": "123-45-6789",
        "driversLicense": "CA123456789",
        "email": "john.smith@example.com",
        "phone": "+1-555-123-4567",
        "address": "123 Main Street, Anytown, CA 90210",
        "emergencyContact": {
            "name": "Jane Smith",
            "relationship": "Spouse",
            "phone": "+1-555-987-6543"
        }
    })
}

fn seed_for(id: &str) -> u64 {
    id.bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

/// Any policy id resolves to a holder record
#[must_use]
pub fn policy_by_id(id: &str) -> Value {
    let mut rng = StdRng::seed_from_u64(seed_for(id));
    let first = pick(&mut rng, &FIRST_NAMES);
    let last = pick(&mut rng, &LAST_NAMES);
    let birth_year = rng.gen_range(1950..2004);

    json!({
        "id": id,
        "policyNumber": format!("INS-{}", rng.gen_range(100_000..1_000_000)),
        "type": pick(&mut rng, &COVERAGES),
        "status": pick(&mut rng, &STATUSES),
        "holderName": format!("{first} {last}"),
        "insuredAmount": rng.gen_range(50..1000) * 1000,
        "dateOfBirth": format!(
            "{birth_year}-{:02}-{:02}",
            rng.gen_range(1..=12),
            rng.gen_range(1..=28)
        ),
        "ssn": format!(
            "{:03}-{:02}-{:04}",
            rng.gen_range(100..900),
            rng.gen_range(10..100),
            rng.gen_range(1000..10_000)
        ),
        "email": format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        "phone": random_phone(&mut rng),
        "address": format!("{} Oak Avenue, Anytown, CA 90210", rng.gen_range(1..2000)),
    })
}

/// Customer profile derived entirely from token claims
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    /// Username from the token
    pub username: String,
    /// Role from the token, whatever it says
    pub role: String,
    /// `first last` split from a dotted username
    pub full_name: String,
    /// `<username>@example.com`
    pub email: String,
    /// Random `+1-555-XXX-XXXX` number
    pub phone: String,
    /// Fixed date of birth
    pub date_of_birth: &'static str,
    /// Fixed postal address
    pub address: Address,
}

/// Postal address
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line
    pub street: &'static str,
    /// City
    pub city: &'static str,
    /// State code
    pub state: &'static str,
    /// ZIP code
    pub zip_code: &'static str,
}

/// `john.smith` becomes `john smith`; a name without a dot gets ` User`
#[must_use]
pub fn full_name_from_username(username: &str) -> String {
    let mut parts = username.split('.');
    let first = parts.next().unwrap_or_default();
    let second = parts.next().filter(|part| !part.is_empty()).unwrap_or("User");
    format!("{first} {second}")
}

/// Build the customer profile for whatever the claims contain
#[must_use]
pub fn customer_profile(claims: &Claims) -> CustomerProfile {
    CustomerProfile {
        username: claims.username.clone(),
        role: claims.role.clone(),
        full_name: full_name_from_username(&claims.username),
        email: format!("{}@example.com", claims.username),
        phone: random_phone(&mut rand::thread_rng()),
        date_of_birth: "1985-03-15",
        address: Address {
            street: "123 Main Street",
            city: "Anytown",
            state: "CA",
            zip_code: "90210",
        },
    }
}

/// Account overview; admins get the enterprise tier
#[must_use]
pub fn account_overview(role: &str) -> Value {
    let is_admin = role == "admin";
    json!({
        "accountType": if is_admin { "Enterprise" } else { "Standard" },
        "renewalDate": "2024-12-31",
        "monthlyPremium": if is_admin { 299.99 } else { 149.99 },
        "paymentMethod": { "last4": "1234", "expiry": "12/25" },
        "recentTransactions": [
            {
                "description": "Monthly Premium Payment",
                "date": "2024-01-15",
                "amount": "149.99",
                "type": "debit",
                "status": "Completed"
            },
            {
                "description": "Policy Adjustment Credit",
                "date": "2024-01-10",
                "amount": "25.00",
                "type": "credit",
                "status": "Completed"
            }
        ],
        "paperlessBilling": true,
        "autoPay": true,
        "emailNotifications": true
    })
}

/// Dashboard statistics
#[must_use]
pub fn admin_stats() -> Value {
    json!({
        "totalPolicies": 4520,
        "activeClaims": 134,
        "totalRevenue": "$2.1M",
        "pendingApprovals": 23,
        "systemHealth": "Excellent",
        "lastBackup": "2024-01-15T10:30:00Z",
        "databaseSize": "1.2GB",
        "activeUsers": 892,
        "failedLogins": 12,
        "securityAlerts": 3
    })
}

/// Settings before any overrides are applied
#[must_use]
pub fn admin_settings_base() -> Value {
    json!({
        "maintenanceMode": false,
        "version": "v3.2.1",
        "allowedIPs": ["127.0.0.1", "192.168.1.0/24", "10.0.0.0/8"],
        "databaseConfig": {
            "host": "db-insurance-prod.company.com",
            "port": 5432,
            "name": "insurance_prod"
        },
        "securitySettings": {
            "maxLoginAttempts": 5,
            "sessionTimeout": 3600,
            "requireMFA": false
        },
        "backupSettings": {
            "frequency": "daily",
            "retention": "30 days",
            "location": "/backups/prod"
        }
    })
}

/// Monthly admin reports
#[must_use]
pub fn admin_reports() -> Value {
    json!({
        "monthlyRevenue": {
            "total": "$1.2M",
            "policies": 2340,
            "claims": 89,
            "netProfit": "$450K"
        },
        "userActivity": {
            "activeUsers": 892,
            "newRegistrations": 45,
            "loginAttempts": 1234,
            "failedLogins": 23
        },
        "systemMetrics": {
            "uptime": "99.9%",
            "responseTime": "120ms",
            "databaseConnections": 45,
            "cacheHitRate": "87%"
        },
        "securityReport": {
            "suspiciousActivities": 12,
            "blockedIPs": 8,
            "failedAuthAttempts": 156,
            "lastSecurityScan": "2024-01-15T08:00:00Z"
        },
        "generatedAt": now_rfc3339(),
        "reportPeriod": "January 2024"
    })
}

/// Confirmation returned after the report archive is cleared
#[must_use]
pub fn cleared_reports(claims: &Claims) -> Value {
    json!({
        "status": "Reports archive cleared",
        "clearedBy": claims.username,
        "userRole": claims.role,
        "clearedAt": now_rfc3339(),
        "affectedReports": [
            "monthly_revenue_2024_01",
            "user_activity_2024_01",
            "system_metrics_2024_01",
            "security_report_2024_01"
        ],
        "message": "All admin reports have been archived and cleared from the system"
    })
}

/// One entry in the notification feed
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Position in the feed, 1-based
    pub id: u32,
    /// `policy`, `payment`, `claim` or `system`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Display text
    pub message: String,
    /// RFC 3339 creation time
    pub timestamp: String,
    /// Whether the user has seen it
    pub read: bool,
}

fn hours_ago<R: Rng + ?Sized>(rng: &mut R, max_hours: i64) -> String {
    let minutes = rng.gen_range(0..max_hours * 60);
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Four notifications with randomized numbers and timestamps
#[must_use]
pub fn notifications() -> Vec<Notification> {
    let mut rng = rand::thread_rng();
    vec![
        Notification {
            id: 1,
            kind: "policy",
            message: format!(
                "Your policy INS-{} will expire in {} days.",
                rng.gen_range(100_000..1_000_000),
                rng.gen_range(10..40)
            ),
            timestamp: hours_ago(&mut rng, 7 * 24),
            read: false,
        },
        Notification {
            id: 2,
            kind: "payment",
            message: format!(
                "Payment received for invoice #INV-2024-{:03}.",
                rng.gen_range(1..1000)
            ),
            timestamp: hours_ago(&mut rng, 3 * 24),
            read: true,
        },
        Notification {
            id: 3,
            kind: "claim",
            message: "Your claim CLM-2024-9876 has been approved and payment will be processed \
                      within 3-5 business days."
                .to_owned(),
            timestamp: hours_ago(&mut rng, 24),
            read: false,
        },
        Notification {
            id: 4,
            kind: "system",
            message: "Your account has been successfully verified. Welcome to our insurance \
                      platform!"
                .to_owned(),
            timestamp: hours_ago(&mut rng, 14 * 24),
            read: true,
        },
    ]
}

/// `CLM-<year>-<0001..=9999>`
#[must_use]
pub fn claim_id() -> String {
    format!(
        "CLM-{}-{:04}",
        Utc::now().year(),
        rand::thread_rng().gen_range(1..=9999)
    )
}

/// What happens after an estimate is filed
pub const CLAIM_NEXT_STEPS: [&str; 3] = [
    "A claims adjuster will review your estimate within 24-48 hours",
    "You may be contacted for additional information or photos",
    "A final claim decision will be provided within 5-7 business days",
];

/// Active auto coverage summary
#[must_use]
pub fn coverage_details() -> Value {
    let split_limits = json!({
        "bodilyInjury": "$100,000 per person / $300,000 per accident",
        "propertyDamage": "$50,000 per accident"
    });
    json!({
        "policyNumber": format!("INS-{}", rand::thread_rng().gen_range(100_000..1_000_000)),
        "policyType": "Auto Insurance",
        "effectiveDate": "2024-01-01",
        "expirationDate": "2025-01-01",
        "status": "Active",
        "coverage": {
            "liability": split_limits.clone(),
            "collision": { "deductible": "$500", "coverage": "Yes" },
            "comprehensive": { "deductible": "$500", "coverage": "Yes" },
            "uninsuredMotorist": split_limits,
            "medicalPayments": "$5,000 per person",
            "rentalReimbursement": "$30 per day, up to 30 days",
            "roadsideAssistance": "Yes",
            "glassCoverage": "Yes"
        },
        "premium": {
            "monthly": "$125.00",
            "annual": "$1,500.00",
            "nextPayment": "2024-02-01"
        },
        "vehicle": {
            "year": "2020",
            "make": "Toyota",
            "model": "Camry",
            "vin": "1HGBH41JXMN109186"
        }
    })
}

/// Canned preview body used when live fetching is off
#[must_use]
pub fn preview_content(url: &str) -> String {
    let source = url
        .split_once("://")
        .map_or(url, |(_, without_scheme)| without_scheme);
    format!(
        "Fetched content from {source}\n\n\
         This is a sample document preview that would normally be fetched from an external \
         service.\n\n\
         Document ID: DOC-2024-001\n\
         Generated: 2024-01-15\n\
         Status: Active"
    )
}
