//! Cross-platform attribute sources backed by `sysinfo` and `if-addrs`
//!
//! Every `sysinfo` probe refreshes only what it reads and runs on the
//! blocking pool, so a slow query never stalls the other sources.

use chrono::DateTime;
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};

use crate::attributes::{AttributeSource, FetchResult, Formatter, RawValue, SourceError};

/// Cross-platform sources in display order
pub fn system_sources() -> Vec<AttributeSource> {
    vec![
        AttributeSource::constant(
            "ApplicationName",
            Formatter::identity(),
            RawValue::from(env!("CARGO_PKG_NAME")),
        ),
        AttributeSource::constant(
            "Version",
            Formatter::identity(),
            RawValue::from(env!("CARGO_PKG_VERSION")),
        ),
        AttributeSource::from_blocking("StartupTime", Formatter::milliseconds(), startup_time),
        AttributeSource::from_blocking("SystemName", Formatter::identity(), || {
            Ok(System::name().map(RawValue::from))
        }),
        AttributeSource::from_blocking("SystemVersion", Formatter::identity(), || {
            Ok(System::os_version().map(RawValue::from))
        }),
        AttributeSource::from_blocking("LongSystemVersion", Formatter::identity(), || {
            Ok(System::long_os_version().map(RawValue::from))
        }),
        AttributeSource::from_blocking("KernelVersion", Formatter::identity(), || {
            Ok(System::kernel_version().map(RawValue::from))
        }),
        AttributeSource::from_blocking("DeviceName", Formatter::identity(), || {
            Ok(System::host_name().map(RawValue::from))
        }),
        AttributeSource::constant(
            "SupportedAbis",
            Formatter::joined(),
            RawValue::List(vec![std::env::consts::ARCH.to_string()]),
        ),
        AttributeSource::from_blocking("CpuBrand", Formatter::identity(), cpu_brand),
        AttributeSource::from_blocking("CpuCount", Formatter::identity(), cpu_count),
        AttributeSource::from_blocking("TotalMemory", Formatter::megabytes(), || {
            memory_reading(|system| system.total_memory())
        }),
        AttributeSource::from_blocking("UsedMemory", Formatter::megabytes(), || {
            memory_reading(|system| system.used_memory())
        }),
        AttributeSource::from_blocking("AvailableMemory", Formatter::megabytes(), || {
            memory_reading(|system| system.available_memory())
        }),
        AttributeSource::from_blocking("TotalDiskCapacity", Formatter::megabytes(), || {
            disk_totals().map(|(total, _)| Some(RawValue::from(total)))
        }),
        AttributeSource::from_blocking("FreeDiskStorage", Formatter::megabytes(), || {
            disk_totals().map(|(_, available)| Some(RawValue::from(available)))
        }),
        AttributeSource::from_blocking("BootTime", Formatter::local_datetime(), boot_time),
        AttributeSource::from_blocking("Uptime", Formatter::duration(), || {
            Ok(Some(RawValue::from(System::uptime())))
        }),
        AttributeSource::from_blocking("LoadAverage", Formatter::joined(), load_average),
        AttributeSource::from_blocking(
            "NetworkInterfaces",
            Formatter::joined(),
            network_interfaces,
        ),
        AttributeSource::from_blocking("IpAddresses", Formatter::joined(), ip_addresses),
    ]
}

/// Launch time of this process as epoch milliseconds
fn startup_time() -> FetchResult {
    let pid = sysinfo::get_current_pid().map_err(SourceError::query)?;
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    match system.process(pid) {
        Some(process) => Ok(Some(RawValue::from(process.start_time().saturating_mul(1_000)))),
        None => Err(SourceError::query("current process not listed")),
    }
}

fn cpu_brand() -> FetchResult {
    let mut system = System::new();
    system.refresh_cpu_all();
    Ok(system
        .cpus()
        .first()
        .map(|cpu| RawValue::from(cpu.brand().trim())))
}

fn cpu_count() -> FetchResult {
    let mut system = System::new();
    system.refresh_cpu_all();
    match system.cpus().len() {
        0 => Err(SourceError::query("no CPUs reported")),
        count => Ok(Some(RawValue::from(count))),
    }
}

fn memory_reading(read: impl Fn(&System) -> u64) -> FetchResult {
    let mut system = System::new();
    system.refresh_memory();
    if system.total_memory() == 0 {
        return Err(SourceError::query("memory information unavailable"));
    }
    Ok(Some(RawValue::from(read(&system))))
}

/// Sums total and available space across all mounted disks
fn disk_totals() -> Result<(u64, u64), SourceError> {
    let disks = Disks::new_with_refreshed_list();
    if disks.list().is_empty() {
        return Err(SourceError::query("no disks reported"));
    }

    Ok(disks.list().iter().fold((0u64, 0u64), |(total, available), disk| {
        (
            total.saturating_add(disk.total_space()),
            available.saturating_add(disk.available_space()),
        )
    }))
}

fn boot_time() -> FetchResult {
    let seconds = System::boot_time();
    if seconds == 0 {
        return Ok(None);
    }
    Ok(DateTime::from_timestamp(seconds as i64, 0).map(RawValue::from))
}

fn load_average() -> FetchResult {
    let load = System::load_average();
    Ok(Some(RawValue::List(vec![
        format!("{:.2}", load.one),
        format!("{:.2}", load.five),
        format!("{:.2}", load.fifteen),
    ])))
}

fn network_interfaces() -> FetchResult {
    let networks = Networks::new_with_refreshed_list();
    let mut names: Vec<String> = networks.list().keys().cloned().collect();
    names.sort();
    Ok(Some(RawValue::List(names)))
}

fn ip_addresses() -> FetchResult {
    let mut addresses: Vec<String> = Vec::new();
    for interface in if_addrs::get_if_addrs()? {
        if interface.is_loopback() {
            continue;
        }
        let address = interface.ip().to_string();
        if !addresses.contains(&address) {
            addresses.push(address);
        }
    }
    Ok(Some(RawValue::List(addresses)))
}
