use std::fmt;

/// The offering a submitter is asking about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceType {
    EquipmentSales,
    LeasingAndRentals,
    RepairService,
    MaintenanceContract,
    FreeConsultation,
    /// A label the form does not offer. Kept verbatim.
    Unlisted(String),
}

impl ServiceType {
    /// The options shown by the form, in display order.
    pub const OFFERED: [ServiceType; 5] = [
        ServiceType::EquipmentSales,
        ServiceType::LeasingAndRentals,
        ServiceType::RepairService,
        ServiceType::MaintenanceContract,
        ServiceType::FreeConsultation,
    ];

    /// Parse a submitted label. An empty label means no selection.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        let service_type = Self::OFFERED
            .into_iter()
            .find(|offered| offered.label() == label)
            .unwrap_or_else(|| Self::Unlisted(label.to_owned()));

        Some(service_type)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::EquipmentSales => "Equipment Sales",
            Self::LeasingAndRentals => "Leasing & Rentals",
            Self::RepairService => "Repair Service",
            Self::MaintenanceContract => "Maintenance Contract",
            Self::FreeConsultation => "Free Consultation",
            Self::Unlisted(label) => label,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
