// ABOUTME: Static navigation table and the role-based visibility filter
// ABOUTME: Pure derivation: ordered subset of entries whose roles include the current role
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Navigation filter.
//!
//! The route table is fixed at build time; the only runtime input is the
//! current role. The filter preserves table order and yields nothing for a
//! missing role.

use crate::models::StaffRole;
use serde::Serialize;

/// One entry in the navigation table
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
    /// Route path the entry links to
    pub path: &'static str,
    /// Label shown in the sidebar
    pub label: &'static str,
    /// Roles permitted to see and enter the route
    #[serde(skip)]
    pub roles: &'static [StaffRole],
}

use StaffRole::{Admin, Coach, MasterAdmin};

/// The console's navigation table, in sidebar order
pub static NAV_TABLE: &[NavEntry] = &[
    NavEntry {
        path: "/overview",
        label: "Overview",
        roles: &[MasterAdmin, Admin],
    },
    NavEntry {
        path: "/schedule",
        label: "Schedule",
        roles: &[MasterAdmin, Admin, Coach],
    },
    NavEntry {
        path: "/members",
        label: "Members",
        roles: &[MasterAdmin, Admin],
    },
    NavEntry {
        path: "/bookings",
        label: "Bookings",
        roles: &[MasterAdmin, Admin, Coach],
    },
    NavEntry {
        path: "/coaches",
        label: "Coaches",
        roles: &[MasterAdmin],
    },
    NavEntry {
        path: "/payroll",
        label: "Payroll",
        roles: &[MasterAdmin],
    },
    NavEntry {
        path: "/leave",
        label: "Leave",
        roles: &[MasterAdmin, Admin, Coach],
    },
    NavEntry {
        path: "/users",
        label: "Users",
        roles: &[MasterAdmin],
    },
];

/// Entries from `table` visible to `role`, in table order. A missing role
/// sees nothing.
#[must_use]
pub fn visible_entries<'a>(
    table: &'a [NavEntry],
    role: Option<StaffRole>,
) -> Vec<&'a NavEntry> {
    let Some(role) = role else {
        return Vec::new();
    };
    table.iter().filter(|e| e.roles.contains(&role)).collect()
}

/// Visible entries from the console's own table
#[must_use]
pub fn visible(role: Option<StaffRole>) -> Vec<&'static NavEntry> {
    visible_entries(NAV_TABLE, role)
}
