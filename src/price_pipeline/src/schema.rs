// Mirrors migrations/2025-01-15-000000_create_processed_tables.

diesel::table! {
    processed_prices (symbol, date) {
        symbol -> Text,
        date -> Date,
        open -> Nullable<Double>,
        high -> Nullable<Double>,
        low -> Nullable<Double>,
        close -> Nullable<Double>,
        volume -> Nullable<BigInt>,
        sma_5 -> Nullable<Double>,
        sma_10 -> Nullable<Double>,
        sma_20 -> Nullable<Double>,
        sma_50 -> Nullable<Double>,
        sma_200 -> Nullable<Double>,
        ema_12 -> Nullable<Double>,
        ema_26 -> Nullable<Double>,
        macd -> Nullable<Double>,
        macd_signal -> Nullable<Double>,
        macd_hist -> Nullable<Double>,
        bb_middle -> Nullable<Double>,
        bb_upper -> Nullable<Double>,
        bb_lower -> Nullable<Double>,
        returns -> Nullable<Double>,
        log_returns -> Nullable<Double>,
        volatility_20 -> Nullable<Double>,
        momentum_20 -> Nullable<Double>,
        volume_sma_20 -> Nullable<Double>,
        volume_ratio -> Nullable<Double>,
        load_ts -> Text,
    }
}

// The table has no key in SQL; diesel needs one declared, and (symbol, date) is what
// the merge matches on.
diesel::table! {
    processed_stage (symbol, date) {
        symbol -> Text,
        date -> Date,
        open -> Nullable<Double>,
        high -> Nullable<Double>,
        low -> Nullable<Double>,
        close -> Nullable<Double>,
        volume -> Nullable<BigInt>,
        sma_5 -> Nullable<Double>,
        sma_10 -> Nullable<Double>,
        sma_20 -> Nullable<Double>,
        sma_50 -> Nullable<Double>,
        sma_200 -> Nullable<Double>,
        ema_12 -> Nullable<Double>,
        ema_26 -> Nullable<Double>,
        macd -> Nullable<Double>,
        macd_signal -> Nullable<Double>,
        macd_hist -> Nullable<Double>,
        bb_middle -> Nullable<Double>,
        bb_upper -> Nullable<Double>,
        bb_lower -> Nullable<Double>,
        returns -> Nullable<Double>,
        log_returns -> Nullable<Double>,
        volatility_20 -> Nullable<Double>,
        momentum_20 -> Nullable<Double>,
        volume_sma_20 -> Nullable<Double>,
        volume_ratio -> Nullable<Double>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(processed_prices, processed_stage,);
