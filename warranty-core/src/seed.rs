//! Fixed warranty fact corpus used to bootstrap the knowledge index.

/// Bumped whenever `SEED_CORPUS` changes; a persisted index built from an
/// older corpus is rebuilt on load.
pub const SEED_CORPUS_VERSION: u32 = 1;

pub const SEED_CORPUS: &[&str] = &[
    // Air Coolers - Voltas
    "Voltas Air Cooler Models: Desert Air Cooler - DZ [PID: VOL-DZ-2024], DZ Pro [PID: VOL-DZP-2024], DZ Elite [PID: VOL-DZE-2024]",
    "Voltas Air Cooler Models: Personal Air Cooler - PZ [PID: VOL-PZ-2024], PZ Pro [PID: VOL-PZP-2024], PZ Elite [PID: VOL-PZE-2024]",
    "Voltas Air Cooler warranty covers manufacturing defects for 1 year",
    "Voltas Air Cooler physical damage is not covered under warranty",
    "Voltas Air Cooler requires regular cleaning to maintain warranty",

    // Air Conditioners - Voltas
    "Voltas AC Models: 1.5 Ton - 183V DZT [PID: VOL-AC-183V-2024], 185V DZT [PID: VOL-AC-185V-2024], 185V DZR [PID: VOL-AC-185VZ-2024], 185V DZR Pro [PID: VOL-AC-185VZP-2024], 185V DZR Elite [PID: VOL-AC-185VZE-2024]",
    "Voltas AC Models: 1.0 Ton - 123V DZT [PID: VOL-AC-123V-2024], 125V DZT [PID: VOL-AC-125V-2024], 125V DZR [PID: VOL-AC-125VZ-2024], 125V DZR Pro [PID: VOL-AC-125VZP-2024], 125V DZR Elite [PID: VOL-AC-125VZE-2024]",
    "Voltas AC Models: 2.0 Ton - 243V DZT [PID: VOL-AC-243V-2024], 245V DZT [PID: VOL-AC-245V-2024], 245V DZR [PID: VOL-AC-245VZ-2024], 245V DZR Pro [PID: VOL-AC-245VZP-2024], 245V DZR Elite [PID: VOL-AC-245VZE-2024]",
    "Voltas AC warranty covers manufacturing defects for 1 year",
    "Voltas AC inverter compressor has lifetime warranty (10 years)",
    "Voltas AC physical damage is not covered under standard warranty",
    "Voltas AC regular maintenance is required every 3 months",

    // Air Conditioners - Blue Star
    "Blue Star AC Models: 1.5 Ton - 5W18 [PID: BLS-AC-5W18-2024], 5W18 Pro [PID: BLS-AC-5W18P-2024], 5W18 Elite [PID: BLS-AC-5W18E-2024]",
    "Blue Star AC Models: 1.0 Ton - 3W12 [PID: BLS-AC-3W12-2024], 3W12 Pro [PID: BLS-AC-3W12P-2024], 3W12 Elite [PID: BLS-AC-3W12E-2024]",
    "Blue Star AC Models: 2.0 Ton - 7W24 [PID: BLS-AC-7W24-2024], 7W24 Pro [PID: BLS-AC-7W24P-2024], 7W24 Elite [PID: BLS-AC-7W24E-2024]",
    "Blue Star AC warranty covers manufacturing defects for 1 year",
    "Blue Star AC inverter compressor has 5-year warranty",
    "Blue Star AC PCB and coils are covered under warranty",

    // Air Conditioners - Panasonic
    "Panasonic AC Models: 1.5 Ton - CS/CU-SU18 [PID: PAN-AC-SU18-2024], CS/CU-SU18 Pro [PID: PAN-AC-SU18P-2024]",
    "Panasonic AC Models: 1.0 Ton - CS/CU-SU12 [PID: PAN-AC-SU12-2024], CS/CU-SU12 Pro [PID: PAN-AC-SU12P-2024]",
    "Panasonic AC Models: 2.0 Ton - CS/CU-SU24 [PID: PAN-AC-SU24-2024], CS/CU-SU24 Pro [PID: PAN-AC-SU24P-2024]",
    "Panasonic AC warranty covers manufacturing defects for 1 year",
    "Panasonic AC inverter compressor has 5-year warranty",
    "Panasonic AC PCB, Condenser, Motor, Eco Casing covered for 5 years",

    // Commercial Refrigerators - Voltas
    "Voltas Commercial Refrigerator Models: Chest Freezer - CF [PID: VOL-CF-2024], CF Pro [PID: VOL-CFP-2024]",
    "Voltas Commercial Refrigerator Models: Glass Top - GT [PID: VOL-GT-2024], GT Pro [PID: VOL-GTP-2024]",
    "Voltas Commercial Refrigerator Models: Convertible - CV [PID: VOL-CV-2024], CV Pro [PID: VOL-CVP-2024]",
    "Voltas Commercial Refrigerator warranty covers 4 years comprehensive",
    "Voltas Commercial Refrigerator gas and labor not covered after 1 year",

    // Visi Coolers & Water Dispensers - Voltas
    "Voltas Visi Cooler Models: VC [PID: VOL-VC-2024], VC Pro [PID: VOL-VCP-2024], VC Elite [PID: VOL-VCE-2024]",
    "Voltas Water Dispenser Models: WD [PID: VOL-WD-2024], WD Pro [PID: VOL-WDP-2024], WD Elite [PID: VOL-WDE-2024]",
    "Voltas Visi Cooler warranty covers 1 year standard",
    "Voltas Water Dispenser warranty covers 1 year standard",
    "Voltas Visi Cooler and Water Dispenser extended warranty available with registration",

    // Microwave Ovens - Panasonic
    "Panasonic Microwave Models: Solo - NN-ST25 [PID: PAN-MW-ST25-2024], NN-ST27 [PID: PAN-MW-ST27-2024]",
    "Panasonic Microwave Models: Convection - NN-CT25 [PID: PAN-MW-CT25-2024], NN-CT27 [PID: PAN-MW-CT27-2024]",
    "Panasonic Microwave Models: Grill - NN-GT25 [PID: PAN-MW-GT25-2024], NN-GT27 [PID: PAN-MW-GT27-2024]",
    "Panasonic Microwave warranty covers 1 year comprehensive",
    "Panasonic Microwave magnetron has 5-year warranty on select models",

    // Washing Machines - Panasonic
    "Panasonic Washing Machine Models: Front Load - NA-F70 [PID: PAN-WM-F70-2024], NA-F80 [PID: PAN-WM-F80-2024]",
    "Panasonic Washing Machine Models: Top Load - NA-F65 [PID: PAN-WM-F65-2024], NA-F75 [PID: PAN-WM-F75-2024]",
    "Panasonic Washing Machine Models: Semi-Auto - NA-W65 [PID: PAN-WM-W65-2024], NA-W75 [PID: PAN-WM-W75-2024]",
    "Panasonic Washing Machine warranty covers 2 years comprehensive",
    "Panasonic Washing Machine motor has 10-year warranty on select models",

    // Refrigerators - Voltas Beko
    "Voltas Beko Refrigerator Models: Single Door - SD [PID: VB-FR-SD-2024], SD Pro [PID: VB-FR-SDP-2024]",
    "Voltas Beko Refrigerator Models: Double Door - DD [PID: VB-FR-DD-2024], DD Pro [PID: VB-FR-DDP-2024]",
    "Voltas Beko Refrigerator Models: Side by Side - SBS [PID: VB-FR-SBS-2024], SBS Pro [PID: VB-FR-SBSP-2024]",
    "Voltas Beko Refrigerator warranty covers 1 year on product",
    "Voltas Beko Refrigerator compressor has 10-year warranty",

    // Televisions - Panasonic
    "Panasonic TV Models: LED - TH-43 [PID: PAN-TV-43-2024], TH-50 [PID: PAN-TV-50-2024], TH-55 [PID: PAN-TV-55-2024]",
    "Panasonic TV Models: Smart TV - TH-43S [PID: PAN-TV-43S-2024], TH-50S [PID: PAN-TV-50S-2024], TH-55S [PID: PAN-TV-55S-2024]",
    "Panasonic TV Models: OLED - TH-48O [PID: PAN-TV-48O-2024], TH-55O [PID: PAN-TV-55O-2024], TH-65O [PID: PAN-TV-65O-2024]",
    "Panasonic TV warranty covers 1 year comprehensive",
    "Panasonic TV panel has 3-year warranty on select models",

    // General warranty info
    "Warranty claims must be filed within 30 days of issue discovery",
    "Service center visits are required for warranty claims",
    "Original purchase receipt is required for warranty claims",
    "Unauthorized repairs void the warranty",
    "Natural disasters are not covered under warranty",
];
