//! Assembly of a RAMAC gather from its header, trace and geometry files.

use ndarray::Array2;

use crate::config::CoreConfig;
use crate::error::MogError;
use crate::formats::rad::{read_rad, RadHeader};
use crate::formats::rd3::read_rd3;
use crate::formats::tlf::{read_tlf, TlfGeometry};
use crate::models::GatherRecord;

/// Antenna lengths above the surface, in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AntennaOffsets {
    pub tx: f64,
    pub rx: f64,
}

/// Offsets of the RAMAC borehole antennas, keyed by nominal frequency (MHz).
///
/// This is a closed table: any other antenna gets zero offsets.
const ANTENNA_OFFSETS: [(f64, AntennaOffsets); 2] = [
    (100.0, AntennaOffsets { tx: 0.665, rx: 0.665 }),
    (250.0, AntennaOffsets { tx: 0.325, rx: 0.365 }),
];

pub fn antenna_offsets(nominal_frequency: f64, synthetic: bool) -> AntennaOffsets {
    if synthetic {
        return AntennaOffsets::default();
    }
    ANTENNA_OFFSETS
        .iter()
        .find(|(freq, _)| *freq == nominal_frequency)
        .map(|(_, offsets)| *offsets)
        .unwrap_or_default()
}

/// Decode the RAMAC gather stored under `basename`.
///
/// Header and trace failures abort the decode. A missing geometry file is
/// logged and tolerated; the depths are then zero.
pub fn read_ramac(basename: &str, config: &CoreConfig) -> Result<GatherRecord, MogError> {
    let header = read_rad(basename, config)?;
    let waveforms = read_rd3(
        basename,
        header.samples_per_trace,
        header.trace_count,
        config,
    )?;
    let geometry = match read_tlf(basename, config) {
        Ok(geometry) => geometry,
        Err(e) if e.is_file_not_found() => {
            tracing::warn!("{e}; continuing without trace geometry");
            TlfGeometry::default()
        }
        Err(e) => return Err(e),
    };

    let name = basename.rsplit('/').next().unwrap_or(basename);
    Ok(assemble(name, header, waveforms, geometry))
}

/// Combine decoded parts into a gather whose arrays all have one entry per trace.
pub fn assemble(
    name: &str,
    header: RadHeader,
    waveforms: Array2<f64>,
    geometry: TlfGeometry,
) -> GatherRecord {
    let n = header.trace_count;
    let offsets = antenna_offsets(header.nominal_frequency, header.synthetic);

    GatherRecord {
        name: name.to_string(),
        trace_count: n,
        samples_per_trace: header.samples_per_trace,
        sample_interval: header.sample_interval,
        times: header.times,
        nominal_frequency: header.nominal_frequency,
        survey_mode: String::new(),
        synthetic: header.synthetic,
        waveforms,
        tx_x: vec![0.0; n],
        tx_y: vec![0.0; n],
        tx_z: fit_to_traces(geometry.tx_z, n, "Tx"),
        rx_x: vec![0.0; n],
        rx_y: vec![0.0; n],
        rx_z: fit_to_traces(geometry.rx_z, n, "Rx"),
        antennas: header.antennas,
        tx_offset: offsets.tx,
        rx_offset: offsets.rx,
        time_units: "ns".to_string(),
        coord_units: "m".to_string(),
        comment: String::new(),
        date: String::new(),
    }
}

fn fit_to_traces(mut depths: Vec<f64>, n: usize, label: &str) -> Vec<f64> {
    if depths.len() > n {
        tracing::debug!("dropping {} {label} depths past trace {n}", depths.len() - n);
    } else if depths.len() < n {
        tracing::warn!("geometry covers {} of {n} traces; padding {label} depths with 0", depths.len());
    }
    depths.resize(n, 0.0);
    depths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(n: usize, nominal_frequency: f64, synthetic: bool) -> RadHeader {
        RadHeader {
            samples_per_trace: 2,
            frequency: 500.0,
            sample_interval: 2.0,
            times: vec![0.0, 2.0],
            synthetic,
            nominal_frequency,
            antennas: "x".to_string(),
            trace_count: n,
        }
    }

    #[test]
    fn test_offset_table() {
        assert_eq!(
            antenna_offsets(100.0, false),
            AntennaOffsets { tx: 0.665, rx: 0.665 }
        );
        assert_eq!(
            antenna_offsets(250.0, false),
            AntennaOffsets { tx: 0.325, rx: 0.365 }
        );
        assert_eq!(antenna_offsets(250.0, true), AntennaOffsets::default());
        assert_eq!(antenna_offsets(500.0, false), AntennaOffsets::default());
    }

    #[test]
    fn test_assemble_truncates_geometry() {
        let geometry = TlfGeometry {
            tx_z: vec![1.0, 1.0, 1.0, 1.0],
            rx_z: vec![0.0, 0.5, 1.0, 1.5],
        };
        let gather = assemble("t0102", header(3, 250.0, false), Array2::zeros((2, 3)), geometry);

        assert_eq!(gather.tx_z, vec![1.0, 1.0, 1.0]);
        assert_eq!(gather.rx_z, vec![0.0, 0.5, 1.0]);
        assert_eq!(gather.tx_offset, 0.325);
        assert_eq!(gather.rx_offset, 0.365);
        assert_eq!(gather.time_units, "ns");
        assert_eq!(gather.coord_units, "m");
    }

    #[test]
    fn test_assemble_pads_and_zero_fills_positions() {
        let geometry = TlfGeometry {
            tx_z: vec![4.0],
            rx_z: vec![2.0],
        };
        let gather = assemble("g", header(3, 100.0, false), Array2::zeros((2, 3)), geometry);

        assert_eq!(gather.tx_z, vec![4.0, 0.0, 0.0]);
        assert_eq!(gather.rx_z, vec![2.0, 0.0, 0.0]);
        for xs in [&gather.tx_x, &gather.tx_y, &gather.rx_x, &gather.rx_y] {
            assert_eq!(xs, &vec![0.0; 3]);
        }
    }
}
