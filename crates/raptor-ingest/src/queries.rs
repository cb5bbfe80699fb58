//! Search terms per differentiation stage. Level 7 (iTreg) has no query
//! set of its own; induced Treg literature is reached through level 4.

use std::collections::BTreeMap;

const LEVEL_QUERIES: [(u8, [&str; 8]); 7] = [
    (
        0,
        [
            "hematopoietic stem cell lineage commitment NOT regulatory",
            "Lin-Sca1+cKit+ HSC bone marrow niche",
            "HSC self-renewal quiescence NOT Treg",
            "stem cell factor SCF TPO hematopoiesis",
            "long-term HSC LT-HSC repopulation NOT lymphocyte",
            "HSC aging stress myeloid bias NOT immune",
            "bone marrow stromal cell HSC maintenance NOT Treg",
            "SLAM markers CD150 CD48 HSC identification",
        ],
    ),
    (
        1,
        [
            "common lymphoid progenitor IL-7R NOT Treg",
            "CLP lymphoid commitment Flt3 NOT regulatory",
            "IL7Ralpha Flt3 progenitor lymphopoiesis",
            "lymphoid lineage specification B T NK",
            "pre-pro-B cell lymphoid development NOT regulatory",
            "Ikaros Pu.1 lymphoid transcription factor",
            "thymus seeding progenitor early T lineage",
            "DN1 thymic progenitor T cell commitment",
        ],
    ),
    (
        2,
        [
            "CD4+ T cell thymic selection NOT regulatory",
            "naive CD4 T cell TCR repertoire NOT Treg",
            "positive selection MHC class II thymus",
            "CD4 single positive thymocyte NOT Foxp3",
            "conventional CD4 T cell effector Th1 Th2 Th17",
            "TCR signaling strength CD4 lineage NOT regulatory",
            "naive T cell homeostasis IL-7 survival",
            "CD62L CCR7 naive T cell lymph node homing",
        ],
    ),
    (
        3,
        [
            "CD4+CD25+CD127low regulatory T cell",
            "CD127low IL-7Ralpha Treg surface marker",
            "CD25high CD127low Treg isolation flow cytometry",
            "IL-7R negative CD25 positive Treg phenotype",
            "CD25 IL-2 receptor alpha Treg activation",
            "GITR CD25 Treg phenotypic marker",
            "CD39 CD73 Treg ectonucleotidase suppression",
            "LAG-3 CD49b Tr1 regulatory subset",
        ],
    ),
    (
        4,
        [
            "thymic regulatory T cell AIRE medulla",
            "peripheral induced Treg TGF-beta retinoic acid",
            "Helios positive nTreg thymic origin",
            "TSDR demethylation Treg lineage stability",
            "Foxp3 CNS2 epigenetic natural induced",
            "gut microbiota induced Treg oral tolerance",
            "vitamin A retinoic acid iTreg differentiation",
            "neuropilin-1 nTreg iTreg distinction marker",
        ],
    ),
    (
        5,
        [
            "Foxp3 transcription factor regulatory T cell",
            "Foxp3 IPEX syndrome immune dysregulation",
            "Scurfin Foxp3 gene mutation",
            "Foxp3 CNS enhancer regulatory element",
            "Foxp3 isoform alternative splicing function",
            "Foxp3 protein interaction NFAT AP-1",
            "Foxp3 acetylation ubiquitination regulation",
            "Foxp3 Eos Helios complex transcriptional repression",
        ],
    ),
    (
        6,
        [
            "Treg suppression CTLA-4 mechanism",
            "regulatory T cell IL-10 TGF-beta cytokine",
            "Treg effector memory CD44 CD62L",
            "tissue-resident regulatory T cell VAT muscle",
            "Treg contact-dependent suppression granzyme perforin",
            "Treg metabolic reprogramming fatty acid oxidation",
            "Treg stability plasticity inflammatory environment",
            "ex-Treg Foxp3 instability autoimmunity",
        ],
    ),
];

/// Level → queries, for levels 0 through 6.
pub fn default_level_queries() -> BTreeMap<u8, Vec<String>> {
    LEVEL_QUERIES
        .iter()
        .map(|(level, queries)| (*level, queries.iter().map(|q| q.to_string()).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_queries_for_each_of_seven_levels() {
        let table = default_level_queries();
        assert_eq!(table.keys().copied().collect::<Vec<_>>(), (0..=6).collect::<Vec<u8>>());
        assert!(table.values().all(|q| q.len() == 8));
    }
}
