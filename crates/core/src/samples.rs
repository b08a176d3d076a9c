//! Built-in sample labels for quick previews and smoke tests.

/// A named sample label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLabel {
    /// Catalogue key.
    pub name: &'static str,
    /// Label markup.
    pub markup: &'static str,
}

/// The sample catalogue, in display order.
pub const SAMPLE_LABELS: &[SampleLabel] = &[
    SampleLabel {
        name: "simple",
        markup: "^XA
^FO50,50^A0N,50,50^FDHello World^FS
^FO50,120^A0N,30,30^FDTest Label^FS
^XZ",
    },
    SampleLabel {
        name: "barcode",
        markup: "^XA
^FO50,50^A0N,30,30^FDProduct Code:^FS
^FO50,90^BY3^BCN,100,Y,N,N^FD5901234123457^FS
^XZ",
    },
    SampleLabel {
        name: "qrcode",
        markup: "^XA
^FO50,50^A0N,30,30^FDScan QR Code:^FS
^FO50,100^BQN,2,5^FDQA,https://example.com^FS
^XZ",
    },
    SampleLabel {
        name: "product",
        markup: "^XA
^FO50,30^A0N,40,40^FDProduct Name^FS
^FO50,80^A0N,25,25^FDSKU: PRD-001234^FS
^FO50,115^A0N,20,20^FDPrice: 29.99 PLN^FS
^FO50,150^BY2^BCN,80,Y,N,N^FD1234567890123^FS
^FO50,260^A0N,18,18^FDMade in Poland^FS
^XZ",
    },
    SampleLabel {
        name: "box",
        markup: "^XA
^FO50,50^GB300,200,3^FS
^FO70,70^A0N,35,35^FDWARNING^FS
^FO70,120^A0N,20,20^FDFragile Content^FS
^FO70,150^A0N,20,20^FDHandle with Care^FS
^XZ",
    },
    SampleLabel {
        name: "line",
        markup: "^XA
^FO50,50^GB300,0,3^FS
^FO50,100^A0N,30,30^FDSection A^FS
^FO50,140^GB300,0,3^FS
^FO50,160^A0N,30,30^FDSection B^FS
^FO50,200^GB300,0,3^FS
^XZ",
    },
    SampleLabel {
        name: "multifield",
        markup: "^XA
^FO50,30^A0N,25,25^FDFrom:^FS
^FO120,30^A0N,25,25^FDWarehouse A^FS
^FO50,60^A0N,25,25^FDTo:^FS
^FO120,60^A0N,25,25^FDCustomer XYZ^FS
^FO50,100^GB300,0,2^FS
^FO50,120^A0N,20,20^FDDate: 2025-01-15^FS
^FO50,150^A0N,20,20^FDWeight: 2.5 kg^FS
^FO50,180^BY2^BCN,60,Y,N,N^FDSHIP001234^FS
^XZ",
    },
    SampleLabel {
        name: "warehouse",
        markup: "^XA
^FO30,20^GB340,280,2^FS
^FO50,40^A0N,45,45^FDLOCATION^FS
^FO50,100^A0N,80,80^FDA-12-03^FS
^FO50,190^GB280,0,2^FS
^FO50,210^A0N,25,25^FDZone: PICKING^FS
^FO50,245^A0N,20,20^FDCapacity: 500 units^FS
^XZ",
    },
];

/// Look up a sample by name (case-insensitive).
pub fn sample(name: &str) -> Option<&'static SampleLabel> {
    SAMPLE_LABELS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Catalogue keys in display order.
pub fn sample_names() -> impl Iterator<Item = &'static str> {
    SAMPLE_LABELS.iter().map(|s| s.name)
}
