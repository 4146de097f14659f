//! Elevation raster (DEM) handling: parsing the ESRI ASCII grid
//! ("AAIGrid") text product and clamped bilinear elevation lookup.
//!
//! # References
//!
//! 1. [ARC/INFO ASCII grid](https://en.wikipedia.org/wiki/Esri_grid)
//! 1. [GDAL AAIGrid driver](https://gdal.org/drivers/raster/aaigrid.html)

mod error;

pub use crate::error::GridError;
use geo::geometry::Coord;

/// Base floating point type used for all coordinates and samples.
///
/// Elevation products arrive as text and tracks are short enough that
/// there is no reason to trade precision for space here, so this is a
/// plain alias rather than a generic parameter.
pub type C = f64;

/// An in-memory elevation raster.
///
/// Row-major, row 0 northernmost, registered to the *lower-left*
/// corner of the covered region — the layout the AAIGrid product
/// uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Lower-left corner of the raster (lon, lat), in degrees.
    ll_corner: Coord<C>,

    /// Size of each cell, in degrees.
    cell_size: C,

    /// Number of (rows, columns) in this raster.
    dimensions: (usize, usize),

    /// Elevation samples, meters.
    samples: Box<[C]>,
}

impl Grid {
    /// Builds a grid from already-decoded parts.
    pub fn new(
        ll_corner: Coord<C>,
        cell_size: C,
        dimensions: (usize, usize),
        samples: Vec<C>,
    ) -> Result<Self, GridError> {
        let (rows, cols) = dimensions;
        if cell_size <= 0.0 {
            return Err(GridError::CellSize(cell_size));
        }
        if rows == 0 || cols == 0 || rows * cols != samples.len() {
            return Err(GridError::Dimensions {
                rows,
                cols,
                samples: samples.len(),
            });
        }
        Ok(Self {
            ll_corner,
            cell_size,
            dimensions,
            samples: samples.into_boxed_slice(),
        })
    }

    /// Parses an AAIGrid text product.
    ///
    /// Header lines (`ncols`, `nrows`, `xllcorner`, `yllcorner`,
    /// `cellsize`, ...) are read until the first non-alphabetic line;
    /// the rest is whitespace-separated row-major samples. Lines that
    /// look like headers but don't parse are recorded in `warnings`
    /// and skipped; a *missing* required header is fatal.
    pub fn parse_ascii(text: &str) -> Result<(Self, Vec<String>), GridError> {
        let mut warnings = Vec::new();

        let mut ncols = None;
        let mut nrows = None;
        let mut xllcorner = None;
        let mut yllcorner = None;
        let mut cellsize = None;

        let mut body_start = 0;
        for (lineno, line) in text.lines().enumerate() {
            if !line.starts_with(|c: char| c.is_ascii_alphabetic()) {
                body_start = lineno;
                break;
            }
            body_start = lineno + 1;

            let mut fields = line.split_whitespace();
            let parsed = match (fields.next(), fields.next()) {
                (Some(key), Some(value)) => value
                    .parse::<C>()
                    .ok()
                    .map(|numeric| (key, numeric))
                    .ok_or((key, value)),
                _ => Err(("", "")),
            };
            let (key, value) = match parsed {
                Ok(pair) => pair,
                Err(_) => {
                    warnings.push(format!("unrecognized header line {line:?} in grid input"));
                    continue;
                }
            };
            match key {
                "ncols" => ncols = Some(value),
                "nrows" => nrows = Some(value),
                "xllcorner" => xllcorner = Some(value),
                "yllcorner" => yllcorner = Some(value),
                "cellsize" => cellsize = Some(value),
                // other well-formed headers (NODATA_value, ...) are
                // allowed and ignored
                _ => {}
            }
        }

        let dim = |value: Option<C>, name| match value {
            Some(v) if v >= 1.0 => Ok(v as usize),
            Some(v) => Err(GridError::HeaderValue {
                key: String::from(name),
                value: v.to_string(),
            }),
            None => Err(GridError::Header(name)),
        };
        let cols = dim(ncols, "ncols")?;
        let rows = dim(nrows, "nrows")?;
        let xll = xllcorner.ok_or(GridError::Header("xllcorner"))?;
        let yll = yllcorner.ok_or(GridError::Header("yllcorner"))?;
        let cell_size = cellsize.ok_or(GridError::Header("cellsize"))?;

        let mut samples = Vec::with_capacity(rows * cols);
        for line in text.lines().skip(body_start) {
            if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
                continue;
            }
            for token in line.split_whitespace() {
                // stray non-numeric junk is tolerated, numeric-looking
                // junk is not
                if !token.contains(|c: char| c.is_ascii_digit()) {
                    continue;
                }
                let sample = token
                    .parse::<C>()
                    .map_err(|_| GridError::Sample(String::from(token)))?;
                samples.push(sample);
            }
        }
        if samples.len() != rows * cols {
            return Err(GridError::SampleCount {
                expected: rows * cols,
                found: samples.len(),
            });
        }

        let grid = Self::new(Coord { x: xll, y: yll }, cell_size, (rows, cols), samples)?;
        Ok((grid, warnings))
    }

    /// Returns the number of (rows, columns) in this raster.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the cell size in degrees.
    pub fn cell_size(&self) -> C {
        self.cell_size
    }

    /// Returns the lower-left corner (lon, lat) in degrees.
    pub fn ll_corner(&self) -> Coord<C> {
        self.ll_corner
    }

    /// Returns the bilinearly interpolated elevation at `coord`
    /// (lon, lat in degrees).
    ///
    /// Fractional indices are clamped to the raster's extent before
    /// interpolating, so sampling at or beyond an edge degrades to
    /// the edge value instead of extrapolating. That costs a little
    /// accuracy on the outermost half cell and can never produce a
    /// NaN.
    pub fn sample(&self, coord: Coord<C>) -> C {
        let (rows, cols) = self.dimensions;
        let x = ((coord.x - self.ll_corner.x) / self.cell_size).clamp(0.0, (cols - 1) as C);
        let y = ((rows as C) - (coord.y - self.ll_corner.y) / self.cell_size)
            .clamp(0.0, (rows - 1) as C);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(cols - 1);
        let y1 = (y0 + 1).min(rows - 1);
        let fx = x - x0 as C;
        let fy = y - y0 as C;

        let north = self.get_xy((x0, y0)) * (1.0 - fx) + self.get_xy((x1, y0)) * fx;
        let south = self.get_xy((x0, y1)) * (1.0 - fx) + self.get_xy((x1, y1)) * fx;
        north * (1.0 - fy) + south * fy
    }
}

/// Private API
impl Grid {
    fn get_xy(&self, (x, y): (usize, usize)) -> C {
        let (_, cols) = self.dimensions;
        self.samples[y * cols + x]
    }
}

#[cfg(test)]
mod parse {
    use super::{Grid, GridError};

    const SMALL: &str = "\
ncols         3
nrows         2
xllcorner     -117.5
yllcorner     34.1
cellsize      0.25
NODATA_value  -9999
1 2 3
4 5 6
";

    #[test]
    fn test_parse_small() {
        let (grid, warnings) = Grid::parse_ascii(SMALL).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(grid.dimensions(), (2, 3));
        assert_eq!(grid.cell_size(), 0.25);
        assert_eq!(grid.ll_corner().x, -117.5);
        assert_eq!(grid.ll_corner().y, 34.1);
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let input = "ncols 3\nnrows 2\nxllcorner 0\nyllcorner 0\n1 2 3 4 5 6\n";
        match Grid::parse_ascii(input) {
            Err(GridError::Header("cellsize")) => (),
            other => panic!("expected missing cellsize, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_header_warns_but_parses() {
        let input = "ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\nbogus header here\n7 8\n";
        let (grid, warnings) = Grid::parse_ascii(input).unwrap();
        assert_eq!(grid.dimensions(), (1, 2));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("bogus header here"));
    }

    #[test]
    fn test_sample_count_mismatch_is_fatal() {
        let input = "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3\n";
        match Grid::parse_ascii(input) {
            Err(GridError::SampleCount {
                expected: 4,
                found: 3,
            }) => (),
            other => panic!("expected sample count mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        use geo::geometry::Coord;
        match Grid::new(Coord { x: 0.0, y: 0.0 }, 1.0, (2, 2), vec![1.0; 5]) {
            Err(GridError::Dimensions { .. }) => (),
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod sampling {
    use super::Grid;
    use approx::assert_relative_eq;
    use geo::geometry::Coord;

    /// 2x2 grid over lon 0..2, lat 0..2; row 0 is the north row.
    fn square() -> Grid {
        Grid::new(
            Coord { x: 0.0, y: 0.0 },
            1.0,
            (2, 2),
            vec![10.0, 20.0, 30.0, 40.0],
        )
        .unwrap()
    }

    #[test]
    fn test_corners() {
        let grid = square();
        // southwest corner lands on the south row
        assert_relative_eq!(grid.sample(Coord { x: 0.0, y: 0.0 }), 30.0);
        // north row at full latitude extent
        assert_relative_eq!(grid.sample(Coord { x: 1.0, y: 2.0 }), 20.0);
        assert_relative_eq!(grid.sample(Coord { x: 0.0, y: 2.0 }), 10.0);
    }

    #[test]
    fn test_bilinear_center() {
        let grid = square();
        assert_relative_eq!(grid.sample(Coord { x: 0.5, y: 1.5 }), 25.0);
    }

    #[test]
    fn test_bilinear_along_row() {
        let grid = square();
        assert_relative_eq!(grid.sample(Coord { x: 0.5, y: 1.0 }), 35.0);
    }

    #[test]
    fn test_clamped_beyond_edges() {
        let grid = square();
        // far northwest clamps to the northwest sample
        assert_relative_eq!(grid.sample(Coord { x: -5.0, y: 10.0 }), 10.0);
        // far southeast clamps to the southeast sample
        assert_relative_eq!(grid.sample(Coord { x: 9.0, y: -3.0 }), 40.0);
    }
}
