use anyhow::{Context, Result};
use std::path::Path;

use super::format::{format_amount, format_date, format_quantity, truncate};
use super::{
    BillsCmd, Command, CustomerCmd, InstallationCmd, MaterialCmd, PaymentCmd, PresetCmd,
    ReportCmd, SettingsCmd,
};
use crate::billing::Engine;
use crate::db::Database;
use crate::export;
use crate::models::{
    CustomerUpdate, InstallationStatus, InstallationUpdate, MaterialPreset, NewCustomer,
    NewInstallation, NewMaterial, NewPayment, Period,
};

pub(crate) fn as_cli(command: Command, db: &mut Database) -> Result<()> {
    let mut engine = Engine::new(db);
    match command {
        Command::Customer { action } => cli_customer(action, &mut engine),
        Command::Installation { action } => cli_installation(action, &mut engine),
        Command::Material { action } => cli_material(action, &mut engine),
        Command::Preset { action } => cli_preset(action, &mut engine),
        Command::Bills { action } => cli_bills(action, &mut engine),
        Command::Payment { action } => cli_payment(action, &mut engine),
        Command::Arrears { customer, csv } => cli_arrears(customer, csv.as_deref(), &engine),
        Command::Report { kind } => cli_report(kind, &engine),
        Command::Settings { action } => cli_settings(action, &mut engine),
    }
}

fn cli_customer(action: CustomerCmd, engine: &mut Engine<'_>) -> Result<()> {
    match action {
        CustomerCmd::Add {
            name,
            address,
            phone,
            since,
        } => {
            let subscription_start_date = since.unwrap_or_else(|| engine.today());
            let customer = engine.create_customer(NewCustomer {
                name,
                address,
                phone,
                subscription_start_date,
            })?;
            println!(
                "Added customer #{} {} (subscribed {})",
                customer.id, customer.name, customer.subscription_start_date
            );
        }
        CustomerCmd::Update {
            id,
            name,
            address,
            phone,
            status,
        } => {
            let customer = engine.update_customer(
                id,
                CustomerUpdate {
                    name,
                    address,
                    phone,
                    status,
                },
            )?;
            println!("Updated customer #{} {} ({})", customer.id, customer.name, customer.status);
        }
        CustomerCmd::List => {
            let customers = engine.get_customers()?;
            if customers.is_empty() {
                println!("No customers");
                return Ok(());
            }
            println!(
                "{:<5} {:<22} {:<28} {:<15} {:<9} Since",
                "ID", "Name", "Address", "Phone", "Status"
            );
            println!("{}", "─".repeat(92));
            for c in &customers {
                println!(
                    "{:<5} {:<22} {:<28} {:<15} {:<9} {}",
                    c.id,
                    truncate(&c.name, 22),
                    truncate(&c.address, 28),
                    truncate(c.phone.as_deref().unwrap_or("-"), 15),
                    c.status,
                    c.subscription_start_date,
                );
            }
            let active = customers.iter().filter(|c| c.is_active()).count();
            println!("{active}/{} active", customers.len());
        }
    }
    Ok(())
}

fn cli_installation(action: InstallationCmd, engine: &mut Engine<'_>) -> Result<()> {
    match action {
        InstallationCmd::Add {
            customer_id,
            fee,
            scheduled,
        } => {
            let inst = engine.create_installation(NewInstallation {
                customer_id,
                installation_fee: fee,
                scheduled_date: scheduled,
            })?;
            println!(
                "Added installation #{} for customer #{} (fee {})",
                inst.id,
                inst.customer_id,
                format_amount(inst.installation_fee)
            );
        }
        InstallationCmd::Update {
            id,
            status,
            fee_paid,
            completed,
        } => {
            let completed_date = match (status, completed) {
                (Some(InstallationStatus::Completed), None) => Some(engine.today()),
                (_, date) => date,
            };
            let inst = engine.update_installation(
                id,
                InstallationUpdate {
                    status,
                    fee_paid,
                    completed_date,
                },
            )?;
            println!(
                "Installation #{}: {}, fee {}, materials {}, profit/loss {}",
                inst.id,
                inst.status,
                if inst.fee_paid { "paid" } else { "unpaid" },
                format_amount(inst.total_material_cost),
                format_amount(inst.profit_loss),
            );
        }
        InstallationCmd::List { customer } => {
            let installations = engine.get_installations(customer)?;
            if installations.is_empty() {
                println!("No installations");
                return Ok(());
            }
            println!(
                "{:<5} {:<9} {:<10} {:>14} {:<6} {:>14} {:>14} {:<11} Completed",
                "ID", "Customer", "Status", "Fee", "Paid", "Materials", "Profit", "Scheduled"
            );
            println!("{}", "─".repeat(104));
            for i in &installations {
                println!(
                    "{:<5} {:<9} {:<10} {:>14} {:<6} {:>14} {:>14} {:<11} {}",
                    i.id,
                    i.customer_id,
                    i.status,
                    format_amount(i.installation_fee),
                    if i.fee_paid { "yes" } else { "no" },
                    format_amount(i.total_material_cost),
                    format_amount(i.profit_loss),
                    format_date(i.scheduled_date),
                    format_date(i.completed_date),
                );
            }
        }
    }
    Ok(())
}

fn cli_material(action: MaterialCmd, engine: &mut Engine<'_>) -> Result<()> {
    match action {
        MaterialCmd::Add {
            installation_id,
            name,
            quantity,
            unit_price,
        } => {
            let unit_price = match unit_price {
                Some(price) => price,
                None => {
                    let presets = engine.get_material_presets()?;
                    MaterialPreset::find_by_name(&presets, name.trim())
                        .map(|p| p.default_unit_price)
                        .ok_or_else(|| {
                            anyhow::anyhow!("No preset named '{name}'. Pass --unit-price")
                        })?
                }
            };
            let material = engine.add_installation_material(NewMaterial {
                installation_id,
                material_name: name,
                quantity,
                unit_price,
            })?;
            println!(
                "Added {} x {} @ {} = {} to installation #{}",
                format_quantity(material.quantity),
                material.material_name,
                format_amount(material.unit_price),
                format_amount(material.total_cost),
                material.installation_id,
            );
        }
        MaterialCmd::List { installation_id } => {
            let materials = engine.get_installation_materials(installation_id)?;
            if materials.is_empty() {
                println!("No materials for installation #{installation_id}");
                return Ok(());
            }
            println!("{:<5} {:<26} {:>10} {:>14} {:>14}", "ID", "Material", "Qty", "Unit", "Total");
            println!("{}", "─".repeat(73));
            for m in &materials {
                println!(
                    "{:<5} {:<26} {:>10} {:>14} {:>14}",
                    m.id,
                    truncate(&m.material_name, 26),
                    format_quantity(m.quantity),
                    format_amount(m.unit_price),
                    format_amount(m.total_cost),
                );
            }
        }
    }
    Ok(())
}

fn cli_preset(action: PresetCmd, engine: &mut Engine<'_>) -> Result<()> {
    match action {
        PresetCmd::Add { name, price, unit } => {
            let preset = engine.create_material_preset(&name, price, &unit)?;
            println!(
                "Added preset {} at {} per {}",
                preset.name,
                format_amount(preset.default_unit_price),
                preset.unit
            );
        }
        PresetCmd::List => {
            let presets = engine.get_material_presets()?;
            if presets.is_empty() {
                println!("No material presets");
                return Ok(());
            }
            println!("{:<5} {:<26} {:>14} Unit", "ID", "Name", "Price");
            println!("{}", "─".repeat(52));
            for p in &presets {
                println!(
                    "{:<5} {:<26} {:>14} {}",
                    p.id,
                    truncate(&p.name, 26),
                    format_amount(p.default_unit_price),
                    p.unit
                );
            }
        }
    }
    Ok(())
}

fn cli_bills(action: BillsCmd, engine: &mut Engine<'_>) -> Result<()> {
    match action {
        BillsCmd::Generate { period, amount } => {
            let period = period.unwrap_or_else(|| Period::containing(engine.today()));
            let bills = engine.generate_monthly_bills(period, amount)?;
            if bills.is_empty() {
                println!("No new bills for {period}");
            } else {
                let total: rust_decimal::Decimal = bills.iter().map(|b| b.amount).sum();
                println!(
                    "Generated {} bills for {period} (total {}), due {}",
                    bills.len(),
                    format_amount(total),
                    period.due_date()
                );
            }
        }
        BillsCmd::List { customer, period } => {
            let bills = engine.get_monthly_bills(customer, period)?;
            if bills.is_empty() {
                println!("No bills");
                return Ok(());
            }
            println!(
                "{:<5} {:<9} {:<8} {:>14} {:<7} Due",
                "ID", "Customer", "Period", "Amount", "Status"
            );
            println!("{}", "─".repeat(58));
            for b in &bills {
                println!(
                    "{:<5} {:<9} {:<8} {:>14} {:<7} {}",
                    b.id,
                    b.customer_id,
                    b.bill_month,
                    format_amount(b.amount),
                    b.status,
                    b.due_date
                );
            }
        }
    }
    Ok(())
}

fn cli_payment(action: PaymentCmd, engine: &mut Engine<'_>) -> Result<()> {
    match action {
        PaymentCmd::Record {
            customer_id,
            amount,
            bill,
            date,
            notes,
        } => {
            let payment_date = date.unwrap_or_else(|| engine.today());
            let payment = engine.record_payment(NewPayment {
                customer_id,
                bill_id: bill,
                amount,
                payment_date,
                notes,
            })?;
            println!(
                "Recorded payment #{} of {} from customer #{} on {}",
                payment.id,
                format_amount(payment.amount),
                payment.customer_id,
                payment.payment_date
            );
            if let Some(bill_id) = payment.bill_id {
                let bills = engine.get_monthly_bills(Some(customer_id), None)?;
                if let Some(b) = bills.iter().find(|b| b.id == bill_id) {
                    println!("Bill #{} ({}) is {}", b.id, b.bill_month, b.status);
                }
            }
        }
        PaymentCmd::List { customer } => {
            let payments = engine.get_payments(customer)?;
            if payments.is_empty() {
                println!("No payments");
                return Ok(());
            }
            println!(
                "{:<5} {:<9} {:<6} {:>14} {:<11} Notes",
                "ID", "Customer", "Bill", "Amount", "Date"
            );
            println!("{}", "─".repeat(64));
            for p in &payments {
                println!(
                    "{:<5} {:<9} {:<6} {:>14} {:<11} {}",
                    p.id,
                    p.customer_id,
                    p.bill_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    format_amount(p.amount),
                    p.payment_date,
                    p.notes.as_deref().unwrap_or(""),
                );
            }
        }
    }
    Ok(())
}

fn cli_arrears(customer: Option<i64>, csv: Option<&Path>, engine: &Engine<'_>) -> Result<()> {
    let rows = engine.get_arrears(customer)?;
    if let Some(path) = csv {
        let count = export::write_arrears(path, &rows)?;
        println!("Exported {count} arrears rows to {}", path.display());
    }
    if rows.is_empty() {
        println!("No outstanding bills");
        return Ok(());
    }

    println!(
        "{:<5} {:<24} {:>14} {:<8} Overdue",
        "ID", "Customer", "Outstanding", "Oldest"
    );
    println!("{}", "─".repeat(64));
    for r in &rows {
        println!(
            "{:<5} {:<24} {:>14} {:<8} {} mo",
            r.customer_id,
            truncate(&r.customer_name, 24),
            format_amount(r.total_outstanding),
            r.oldest_unpaid_period,
            r.periods_overdue,
        );
    }
    let total: rust_decimal::Decimal = rows.iter().map(|r| r.total_outstanding).sum();
    println!("{}", "─".repeat(64));
    println!("{:<30} {:>14}", "Total", format_amount(total));
    Ok(())
}

fn cli_report(kind: ReportCmd, engine: &Engine<'_>) -> Result<()> {
    match kind {
        ReportCmd::Monthly { period, csv } => {
            let report = engine.get_monthly_report(period, None)?;
            if let Some(path) = csv {
                export::write_monthly_report(&path, &report)?;
                println!("Exported monthly report to {}", path.display());
            }

            println!("Monthly report — {}", report.period);
            println!("{}", "─".repeat(40));
            println!("  Subscriptions:   {:>16}", format_amount(report.subscription_income));
            println!("  Installations:   {:>16}", format_amount(report.installation_income));
            println!("  Total income:    {:>16}", format_amount(report.total_income));
            println!("  Materials:       {:>16}", format_amount(report.material_expenses));
            println!("  Net balance:     {:>16}", format_amount(report.net_balance));
            println!("  Active customers:{:>16}", report.total_customers);
            println!("  New installs:    {:>16}", report.new_installations);
        }
        ReportCmd::Installations { from, to, csv } => {
            let rows = engine.get_installation_report(from, to)?;
            if let Some(path) = csv {
                let count = export::write_installation_report(&path, &rows)?;
                println!("Exported {count} installations to {}", path.display());
            }
            if rows.is_empty() {
                println!("No installations");
                return Ok(());
            }

            println!(
                "{:<5} {:<22} {:>14} {:>14} {:>14} {:<10} Completed",
                "ID", "Customer", "Fee", "Materials", "Profit", "Status"
            );
            println!("{}", "─".repeat(96));
            for r in &rows {
                println!(
                    "{:<5} {:<22} {:>14} {:>14} {:>14} {:<10} {}",
                    r.installation_id,
                    truncate(&r.customer_name, 22),
                    format_amount(r.installation_fee),
                    format_amount(r.material_cost),
                    format_amount(r.profit_loss),
                    r.status,
                    format_date(r.completed_date),
                );
            }
            let profit: rust_decimal::Decimal = rows.iter().map(|r| r.profit_loss).sum();
            println!("{}", "─".repeat(96));
            println!("{:<28} {:>44}", "Total profit/loss", format_amount(profit));
        }
    }
    Ok(())
}

fn cli_settings(action: SettingsCmd, engine: &mut Engine<'_>) -> Result<()> {
    match action {
        SettingsCmd::List => {
            println!("{:<24} {:<20} Updated", "Key", "Value");
            println!("{}", "─".repeat(60));
            for s in &engine.get_settings()? {
                let updated = if s.id == 0 {
                    "(default)"
                } else {
                    s.updated_at.as_str()
                };
                println!("{:<24} {:<20} {}", s.key, truncate(&s.value, 20), updated);
            }
        }
        SettingsCmd::Set { key, value } => {
            let setting = engine
                .update_setting(&key, &value)
                .with_context(|| format!("Failed to update setting '{key}'"))?;
            println!("{} = {}", setting.key, setting.value);
        }
    }
    Ok(())
}
