const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// A labeled stop on the tour.
///
/// `region` and `name` are opaque labels. Coordinates are degrees, but the
/// search treats them as planar `x = latitude`, `y = longitude`.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    pub region: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn new(
        region: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            region: region.into(),
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Straight-line distance in coordinate units.
    #[inline]
    pub fn dist(&self, rhs: &Self) -> f64 {
        let dlat = self.latitude - rhs.latitude;
        let dlng = self.longitude - rhs.longitude;
        (dlat * dlat + dlng * dlng).sqrt()
    }

    /// Finite and within `[-90, 90]` latitude, `[-180, 180]` longitude.
    pub(crate) fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-NINETY..=NINETY).contains(&self.latitude)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.longitude)
    }
}
