use crate::store::store::ElementStore;

// ============================================================================
// websites subcommand
// ============================================================================

/// List every hostname partition with its record count.
pub fn cmd_websites(store: &ElementStore, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let websites = store.all_websites()?;

    if websites.is_empty() {
        println!("No hidden elements on any website.");
        return Ok(());
    }

    for (hostname, records) in &websites {
        println!(
            "{} — {} hidden element{}",
            hostname,
            records.len(),
            if records.len() == 1 { "" } else { "s" }
        );
        if verbose > 0 {
            for record in records {
                println!("  {}  {}  {}", record.id, record.capture.descriptor, record.selector());
            }
        }
    }

    Ok(())
}

// ============================================================================
// list subcommand
// ============================================================================

/// List the records for one hostname, capture order.
pub fn cmd_list(store: &ElementStore, hostname: &str) -> Result<(), Box<dyn std::error::Error>> {
    let records = store.list(hostname)?;

    if records.is_empty() {
        println!("No hidden elements for {}.", hostname);
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {}  {}  (hidden {})",
            record.id,
            record.capture.descriptor,
            record.selector(),
            record.deleted_at.to_rfc3339()
        );
    }

    Ok(())
}

// ============================================================================
// restore subcommands
// ============================================================================

/// Delete one record. Absent ids are a no-op, mirroring page restore.
pub fn cmd_restore(
    store: &mut ElementStore,
    hostname: &str,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if store.remove(hostname, id)? {
        println!("Restored {} on {}.", id, hostname);
    } else {
        println!("No record {} for {} (already restored?).", id, hostname);
    }
    Ok(())
}

/// Drop a hostname's whole partition.
pub fn cmd_restore_all(
    store: &mut ElementStore,
    hostname: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let count = store.list(hostname)?.len();
    store.remove_all(hostname)?;
    println!(
        "Restored {} element{} on {}.",
        count,
        if count == 1 { "" } else { "s" },
        hostname
    );
    Ok(())
}
